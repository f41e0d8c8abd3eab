use super::{Partition, Rank};
use crate::error::CoordinationError;
use crate::pipeline::FileTask;

/// Round-robin assignment: task `i` goes to rank `i mod ranks`
///
/// Every task lands in exactly one partition and partition sizes differ by at
/// most one. Ranks beyond the task count receive empty partitions.
pub fn distribute(tasks: Vec<FileTask>, ranks: usize) -> Result<Vec<Partition>, CoordinationError> {
    if ranks == 0 {
        return Err(CoordinationError::NoRanks);
    }

    let mut partitions: Vec<Partition> = (0..ranks)
        .map(|rank: Rank| Partition {
            rank,
            tasks: Vec::with_capacity(tasks.len() / ranks + 1),
        })
        .collect();
    for (index, task) in tasks.into_iter().enumerate() {
        partitions[index % ranks].tasks.push(task);
    }
    Ok(partitions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn tasks(count: usize) -> Vec<FileTask> {
        (0..count).map(|i| FileTask::new(format!("f{i:02}.txt"))).collect()
    }

    #[test]
    fn test_every_task_in_exactly_one_partition() {
        for files in [0usize, 1, 5, 12, 13] {
            for ranks in 1..=6 {
                let partitions = distribute(tasks(files), ranks).unwrap();
                assert_eq!(partitions.len(), ranks);

                let mut seen = HashSet::new();
                for partition in &partitions {
                    for task in &partition.tasks {
                        assert!(seen.insert(task.clone()), "{task} assigned twice");
                    }
                    let size = partition.len();
                    assert!(size == files / ranks || size == files.div_ceil(ranks));
                }
                assert_eq!(seen.len(), files);
            }
        }
    }

    #[test]
    fn test_round_robin_order() {
        let partitions = distribute(tasks(5), 2).unwrap();

        let names: Vec<Vec<String>> = partitions
            .iter()
            .map(|p| p.tasks.iter().map(|t| t.to_string()).collect())
            .collect();
        assert_eq!(
            names,
            vec![
                vec!["f00.txt", "f02.txt", "f04.txt"],
                vec!["f01.txt", "f03.txt"]
            ]
        );
        assert_eq!(partitions[1].rank, 1);
    }

    #[test]
    fn test_zero_ranks_rejected() {
        assert!(matches!(distribute(tasks(3), 0), Err(CoordinationError::NoRanks)));
    }
}
