/*!
# Templates
Named reference sequences that variants are replayed against.
Sequences are kept as loaded and only encoded into base codes when a sequence is evaluated.
*/

use anyhow::anyhow;
use indexmap::IndexSet;
use log::debug;
use rust_lib_reference_genome::reference_genome::ReferenceGenome;
use std::path::Path;

use crate::data_types::dna;

/// Reference sequences by name
pub struct Templates {
    /// The loaded reference
    reference: ReferenceGenome,
    /// Sequence names, in the order the reference reports them
    names: IndexSet<String>
}

impl Templates {
    /// Loads every sequence from a FASTA file
    /// # Arguments
    /// * `filename` - the FASTA file, optionally gzipped
    /// # Errors
    /// * if the file cannot be loaded
    pub fn from_fasta(filename: &Path) -> anyhow::Result<Self> {
        let reference = ReferenceGenome::from_fasta(filename)
            .map_err(|e| anyhow!("Error while loading reference genome from {filename:?}: {e:?}"))?;
        Ok(Self::from_reference(reference))
    }

    /// Wraps an already loaded reference
    pub fn from_reference(reference: ReferenceGenome) -> Self {
        let names: IndexSet<String> = reference.contig_keys().iter().cloned().collect();
        debug!("Loaded {} template sequences", names.len());
        Self { reference, names }
    }

    /// Creates an in-memory set of templates, mostly for testing
    /// # Arguments
    /// * `sequences` - pairs of name and ASCII sequence
    /// # Errors
    /// * if a sequence cannot be added, such as a duplicate name
    pub fn from_sequences(sequences: &[(&str, &str)]) -> anyhow::Result<Self> {
        let mut reference = ReferenceGenome::empty_reference();
        for &(name, sequence) in sequences.iter() {
            reference.add_contig(name.to_string(), sequence)
                .map_err(|e| anyhow!("Error while adding template {name}: {e:?}"))?;
        }
        Ok(Self::from_reference(reference))
    }

    /// True if the sequence is present
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// The template for a sequence as base codes, or None if it is not present
    pub fn encoded(&self, name: &str) -> Option<Vec<u8>> {
        if self.contains(name) {
            Some(dna::encode(self.reference.get_full_chromosome(name)))
        } else {
            None
        }
    }

    /// Sequence names
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(|n| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
