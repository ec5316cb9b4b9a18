// src/pipes.rs

//! Pipe registry: which named pipes exist and who uses them.
//!
//! Pipes are not first-class entities in the jobfile; they are derived from
//! the job list on demand. Two jobs reference the same pipe iff their names
//! are textually identical.

use std::collections::HashMap;

use crate::jobfile::JobSpec;

/// Usage record for one distinct pipe name.
#[derive(Debug, Clone)]
pub struct PipeUse {
    /// Pipe name without the `@` prefix.
    pub name: String,
    /// Indices of jobs whose output is this pipe.
    pub writers: Vec<usize>,
    /// Indices of jobs whose input is this pipe.
    pub readers: Vec<usize>,
}

impl PipeUse {
    /// Exactly one writer and exactly one reader.
    pub fn conforms(&self) -> bool {
        self.writers.len() == 1 && self.readers.len() == 1
    }
}

/// All distinct pipes referenced by a job list, in first-reference order.
///
/// First-reference order keeps diagnostics deterministic across runs.
#[derive(Debug, Clone, Default)]
pub struct PipeTable {
    entries: Vec<PipeUse>,
    index: HashMap<String, usize>,
}

impl PipeTable {
    /// Build the table from job descriptors, counting every reference
    /// (including jobs already disabled for other reasons).
    pub fn collect<'a>(specs: impl Iterator<Item = &'a JobSpec>) -> Self {
        let mut table = PipeTable::default();

        for (job, spec) in specs.enumerate() {
            if let Some(name) = spec.input.pipe_name() {
                table.entry(name).readers.push(job);
            }
            if let Some(name) = spec.output.pipe_name() {
                table.entry(name).writers.push(job);
            }
        }

        table
    }

    fn entry(&mut self, name: &str) -> &mut PipeUse {
        let slot = match self.index.get(name) {
            Some(&slot) => slot,
            None => {
                let slot = self.entries.len();
                self.entries.push(PipeUse {
                    name: name.to_string(),
                    writers: Vec::new(),
                    readers: Vec::new(),
                });
                self.index.insert(name.to_string(), slot);
                slot
            }
        };
        &mut self.entries[slot]
    }

    pub fn iter(&self) -> impl Iterator<Item = &PipeUse> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobfile::IoSpec;

    fn spec(input: IoSpec, output: IoSpec) -> JobSpec {
        JobSpec {
            program: "true".to_string(),
            input,
            output,
            timeout: None,
            args: Vec::new(),
        }
    }

    fn pipe(name: &str) -> IoSpec {
        IoSpec::Pipe(name.to_string())
    }

    #[test]
    fn counts_writers_and_readers_per_name() {
        let specs = vec![
            spec(IoSpec::Inherit, pipe("a")),
            spec(pipe("a"), pipe("b")),
            spec(pipe("b"), IoSpec::Inherit),
        ];
        let table = PipeTable::collect(specs.iter());

        assert_eq!(table.len(), 2);
        let entries: Vec<_> = table.iter().collect();
        assert_eq!(entries[0].name, "a");
        assert_eq!(entries[0].writers, vec![0]);
        assert_eq!(entries[0].readers, vec![1]);
        assert_eq!(entries[1].name, "b");
        assert_eq!(entries[1].writers, vec![1]);
        assert_eq!(entries[1].readers, vec![2]);
    }

    #[test]
    fn entries_appear_in_first_reference_order() {
        let specs = vec![
            spec(pipe("late"), pipe("early")),
            spec(pipe("early"), pipe("late")),
        ];
        let table = PipeTable::collect(specs.iter());
        // Job 0's input is scanned before its output.
        let names: Vec<_> = table.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["late", "early"]);
    }

    #[test]
    fn same_pipe_as_input_and_output_counts_twice() {
        let specs = vec![spec(pipe("x"), pipe("x"))];
        let table = PipeTable::collect(specs.iter());
        let entry = table.iter().next().unwrap();
        assert_eq!(entry.writers, vec![0]);
        assert_eq!(entry.readers, vec![0]);
        assert!(entry.conforms());
    }

    #[test]
    fn files_and_inherited_streams_create_no_entries() {
        let specs = vec![spec(
            IoSpec::File("in.txt".into()),
            IoSpec::Inherit,
        )];
        assert!(PipeTable::collect(specs.iter()).is_empty());
    }
}
