use crate::domain::utils::id::{FileName, JobId};
use crate::domain::workflow::Workflow;
use crate::error::{Error, Result};

/// Transformation used for every merge job.
pub const MERGE_TRANSFORMATION: &str = "merge";

/// Name of the single persisted artifact at the root of the tree.
pub const FINAL_OUTPUT: &str = "results.tar.gz";

/// Role of all merge jobs created on one level of the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeRole {
    IntermediateMerge,
    FinalMerge,
}

impl MergeRole {
    /// A level is final iff all of its parents fit into a single chunk.
    pub fn for_level(parent_count: usize, max_fan_in: usize) -> Self {
        if parent_count <= max_fan_in { MergeRole::FinalMerge } else { MergeRole::IntermediateMerge }
    }

    /// `chunk_index` is 1-based within the level.
    pub fn output_name(self, level: usize, chunk_index: usize) -> FileName {
        match self {
            MergeRole::FinalMerge => FileName::new(FINAL_OUTPUT),
            MergeRole::IntermediateMerge => FileName::new(format!("results-l{}-j{}.tar.gz", level, chunk_index)),
        }
    }

    pub fn persist(self) -> bool {
        self == MergeRole::FinalMerge
    }
}

/// The parents being reduced at one depth of the tree.
#[derive(Debug, Clone)]
pub struct MergeLevel {
    pub level: usize,
    pub role: MergeRole,
    pub parents: Vec<JobId>,
}

impl MergeLevel {
    pub fn new(level: usize, parents: Vec<JobId>, max_fan_in: usize) -> Self {
        let role = MergeRole::for_level(parents.len(), max_fan_in);
        MergeLevel { level, role, parents }
    }
}

/// Result of a reduction: the root job and the merge jobs of every level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeTree {
    pub root: JobId,

    /// `levels[0]` holds the merge jobs of level 1; the last entry is `[root]`.
    pub levels: Vec<Vec<JobId>>,
}

impl MergeTree {
    pub fn merge_job_count(&self) -> usize {
        self.levels.iter().map(Vec::len).sum()
    }
}

/// Reduces an ordered list of leaf jobs into a single merge job.
///
/// Parents are chunked positionally into groups of at most `max_fan_in`;
/// every chunk becomes one merge job consuming all outputs of its parents.
/// Levels repeat until one chunk remains, whose job writes [`FINAL_OUTPUT`].
#[derive(Debug, Clone)]
pub struct MergeTreeBuilder {
    max_fan_in: usize,
}

impl MergeTreeBuilder {
    pub fn new(max_fan_in: usize) -> Result<Self> {
        if max_fan_in < 2 {
            return Err(Error::InvalidFanInError(max_fan_in));
        }
        Ok(MergeTreeBuilder { max_fan_in })
    }

    pub fn max_fan_in(&self) -> usize {
        self.max_fan_in
    }

    /// Extends `workflow` with the merge levels above `leaves`.
    ///
    /// Returns `None` for zero or one leaf; a single leaf is left untouched and
    /// its outputs are neither renamed nor marked persistent.
    pub fn build(&self, workflow: &mut Workflow, leaves: &[JobId]) -> Result<Option<MergeTree>> {
        match leaves {
            [] => {
                log::info!("No jobs to merge.");
                return Ok(None);
            }
            [single] => {
                log::warn!(
                    "Only one job ({}) to merge. No merge job is created, so its outputs are not renamed to '{}' and not persisted.",
                    single,
                    FINAL_OUTPUT
                );
                return Ok(None);
            }
            _ => {}
        }

        let mut levels: Vec<Vec<JobId>> = Vec::new();
        let mut current = MergeLevel::new(1, leaves.to_vec(), self.max_fan_in);

        loop {
            let mut merge_jobs = Vec::with_capacity(current.parents.len().div_ceil(self.max_fan_in));
            for (index, chunk) in current.parents.chunks(self.max_fan_in).enumerate() {
                merge_jobs.push(self.merge_chunk(workflow, &current, index + 1, chunk)?);
            }

            log::debug!(
                "Merge level {} ({:?}): {} parents -> {} jobs",
                current.level,
                current.role,
                current.parents.len(),
                merge_jobs.len()
            );

            let is_final = current.role == MergeRole::FinalMerge;
            levels.push(merge_jobs.clone());
            if is_final {
                break;
            }
            current = MergeLevel::new(current.level + 1, merge_jobs, self.max_fan_in);
        }

        let root = levels.last().and_then(|level| level.first()).cloned();
        if let Some(root) = &root {
            log::info!(
                "Merge tree complete: {} levels, root job {} writes '{}'.",
                levels.len(),
                root,
                FINAL_OUTPUT
            );
        }
        Ok(root.map(|root| MergeTree { root, levels }))
    }

    fn merge_chunk(
        &self,
        workflow: &mut Workflow,
        level: &MergeLevel,
        chunk_index: usize,
        chunk: &[JobId],
    ) -> Result<JobId> {
        let output = level.role.output_name(level.level, chunk_index);

        let mut inputs: Vec<FileName> = Vec::new();
        for parent in chunk {
            let job = workflow.job(parent).ok_or_else(|| Error::UnknownJobError(parent.to_string()))?;
            inputs.extend(job.output_names().cloned());
        }

        let mut arguments = Vec::with_capacity(inputs.len() + 1);
        arguments.push(output.to_string());
        arguments.extend(inputs.iter().map(ToString::to_string));

        let merge_job = workflow.add_job(MERGE_TRANSFORMATION, arguments)?;
        workflow.declare_output(&merge_job, output, level.role.persist())?;
        for input in inputs {
            workflow.declare_input(&merge_job, input)?;
        }
        // Parents without outputs still have to run first.
        for parent in chunk {
            workflow.add_dependency(parent, &merge_job)?;
        }

        Ok(merge_job)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fan_in_below_two_is_rejected() {
        assert!(matches!(MergeTreeBuilder::new(0), Err(Error::InvalidFanInError(0))));
        assert!(matches!(MergeTreeBuilder::new(1), Err(Error::InvalidFanInError(1))));
        assert_eq!(MergeTreeBuilder::new(2).unwrap().max_fan_in(), 2);
    }

    #[test]
    fn test_role_is_decided_by_parent_count() {
        assert_eq!(MergeRole::for_level(25, 25), MergeRole::FinalMerge);
        assert_eq!(MergeRole::for_level(26, 25), MergeRole::IntermediateMerge);
        assert_eq!(MergeRole::for_level(2, 2), MergeRole::FinalMerge);
    }

    #[test]
    fn test_output_names() {
        assert_eq!(MergeRole::IntermediateMerge.output_name(1, 3).as_str(), "results-l1-j3.tar.gz");
        assert_eq!(MergeRole::FinalMerge.output_name(2, 1).as_str(), "results.tar.gz");
        assert!(MergeRole::FinalMerge.persist());
        assert!(!MergeRole::IntermediateMerge.persist());
    }
}
