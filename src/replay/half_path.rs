use std::cmp::Ordering;
use std::fmt;

use crate::data_types::dna;
use crate::data_types::oriented_variant::{Haplotype, OrientedVariant};
use crate::data_types::variants::Variant;
use crate::replay::haplotype_playback::{HaplotypePlayback, PlaybackError};
use crate::util::persistent_list::PersistentList;

/// One side (baseline or called) of a path: both haplotype playbacks and the decisions that produced them.
/// Decision lists are shared with the parent path, so cloning is cheap.
#[derive(Clone, Debug)]
pub struct HalfPath<'a> {
    /// Playback of haplotype A
    haplotype_a: HaplotypePlayback<'a>,
    /// Playback of haplotype B
    haplotype_b: HaplotypePlayback<'a>,
    /// Included orientations, newest first
    included: PersistentList<OrientedVariant<'a>>,
    /// Excluded variants, newest first
    excluded: PersistentList<&'a Variant>,
    /// Variants dropped by the skip policy, newest first
    skipped: PersistentList<&'a Variant>,
    /// Furthest (clamped) end of any decided variant
    variant_end_position: i64,
    /// Index of the last decided variant
    variant_index: Option<usize>
}

impl<'a> HalfPath<'a> {
    /// Creates an empty half path over a template
    pub fn new(template: &'a [u8]) -> Self {
        Self {
            haplotype_a: HaplotypePlayback::new(template),
            haplotype_b: HaplotypePlayback::new(template),
            included: PersistentList::new(),
            excluded: PersistentList::new(),
            skipped: PersistentList::new(),
            variant_end_position: 0,
            variant_index: None
        }
    }

    fn clamped_end(&self, variant: &Variant) -> i64 {
        variant.end().min(self.haplotype_a.template().len()) as i64
    }

    fn record_decision(&mut self, variant: &Variant, index: usize) {
        self.variant_end_position = self.variant_end_position.max(self.clamped_end(variant));
        self.variant_index = Some(index);
    }

    /// Includes an orientation, queueing its alleles on each haplotype.
    /// # Arguments
    /// * `ov` - the orientation to include
    /// * `index` - index of the variant in this side's input list
    /// # Errors
    /// * if either allele conflicts with what was already queued
    pub fn include(&mut self, ov: OrientedVariant<'a>, index: usize) -> Result<(), PlaybackError> {
        self.haplotype_a.add_allele(ov.allele(Haplotype::A))?;
        self.haplotype_b.add_allele(ov.allele(Haplotype::B))?;
        self.included = self.included.push(ov);
        self.record_decision(ov.variant(), index);
        Ok(())
    }

    /// Excludes a variant from this half path
    pub fn exclude(&mut self, variant: &'a Variant, index: usize) {
        self.excluded = self.excluded.push(variant);
        self.record_decision(variant, index);
    }

    /// Marks a variant as skipped without deciding it
    pub fn skip(&mut self, variant: &'a Variant, index: usize) {
        self.skipped = self.skipped.push(variant);
        self.variant_index = Some(index);
    }

    /// True if every allele of the orientation could be queued on its haplotype
    pub fn is_new(&self, ov: &OrientedVariant<'a>) -> bool {
        self.haplotype_a.is_new(ov.allele(Haplotype::A)) && self.haplotype_b.is_new(ov.allele(Haplotype::B))
    }

    /// The furthest template position of the two haplotypes
    pub fn position(&self) -> i64 {
        self.haplotype_a.template_position().max(self.haplotype_b.template_position())
    }

    /// Compares the template position of haplotype A against haplotype B
    pub fn compare_haplotype_positions(&self) -> Ordering {
        self.haplotype_a.template_position().cmp(&self.haplotype_b.template_position())
    }

    pub fn haplotype(&self, haplotype: Haplotype) -> &HaplotypePlayback<'a> {
        match haplotype {
            Haplotype::A => &self.haplotype_a,
            Haplotype::B => &self.haplotype_b
        }
    }

    /// Steps a single haplotype by one base
    pub fn step_haplotype(&mut self, haplotype: Haplotype) {
        match haplotype {
            Haplotype::A => self.haplotype_a.step(),
            Haplotype::B => self.haplotype_b.step()
        }
    }

    /// Steps both haplotypes by one base
    pub fn step(&mut self) {
        self.haplotype_a.step();
        self.haplotype_b.step();
    }

    /// Fast-forwards both haplotypes to a template position
    pub fn move_forward(&mut self, position: i64) -> Result<(), PlaybackError> {
        self.haplotype_a.move_forward(position)?;
        self.haplotype_b.move_forward(position)
    }

    pub fn finished(&self) -> bool {
        self.haplotype_a.finished() && self.haplotype_b.finished()
    }

    pub fn is_on_template(&self) -> bool {
        self.haplotype_a.is_on_template() && self.haplotype_b.is_on_template()
    }

    pub fn wants_future_variant_bases(&self) -> bool {
        self.haplotype_a.wants_future_variant_bases() || self.haplotype_b.wants_future_variant_bases()
    }

    /// Index of the next undecided variant
    pub fn next_variant_index(&self) -> usize {
        self.variant_index.map_or(0, |i| i + 1)
    }

    /// Renders both haplotypes over a template range as `"{start+1}-{end} A|B"`.
    /// Template bases are lower case, bases from included alleles are upper case.
    /// # Arguments
    /// * `start` - 0-based first template position to render
    /// * `end` - 0-based exclusive end of the rendered range
    pub fn dump_haplotypes(&self, start: i64, end: i64) -> Result<String, PlaybackError> {
        let template = self.haplotype_a.template();
        let included = self.included.to_vec();
        let mut rendered = vec![];
        for haplotype in [Haplotype::A, Haplotype::B] {
            let mut playback = HaplotypePlayback::new(template);
            for ov in included.iter() {
                playback.add_allele(ov.allele(haplotype))?;
            }
            let mut bases = String::new();
            while let Some(nt) = playback.next_base() {
                let position = playback.template_position();
                if position >= start && position < end {
                    let symbol = if playback.is_on_template() {
                        dna::decode_base_lower(nt)
                    } else {
                        dna::decode_base(nt)
                    };
                    bases.push(symbol as char);
                }
            }
            rendered.push(bases);
        }
        Ok(format!("{}-{} {}|{}", start + 1, end, rendered[0], rendered[1]))
    }

    // getters
    pub fn included(&self) -> &PersistentList<OrientedVariant<'a>> {
        &self.included
    }

    pub fn excluded(&self) -> &PersistentList<&'a Variant> {
        &self.excluded
    }

    pub fn skipped(&self) -> &PersistentList<&'a Variant> {
        &self.skipped
    }

    pub fn included_count(&self) -> usize {
        self.included.len()
    }

    pub fn excluded_count(&self) -> usize {
        self.excluded.len()
    }

    pub fn variant_end_position(&self) -> i64 {
        self.variant_end_position
    }

    pub fn variant_index(&self) -> Option<usize> {
        self.variant_index
    }
}

impl PartialEq for HalfPath<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HalfPath<'_> {}

impl PartialOrd for HalfPath<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HalfPath<'_> {
    /// Two half paths are equal when they would produce the same future output and have decided the same variants
    fn cmp(&self, other: &Self) -> Ordering {
        self.haplotype_a.cmp(&other.haplotype_a)
            .then_with(|| self.haplotype_b.cmp(&other.haplotype_b))
            .then(self.variant_index.cmp(&other.variant_index))
    }
}

impl fmt::Display for HalfPath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let included: Vec<String> = self.included.to_vec().iter().map(|ov| ov.to_string()).collect();
        let excluded: Vec<String> = self.excluded.to_vec().iter().map(|v| v.to_string()).collect();
        write!(
            f, "position={} variant_end={} included=[{}] excluded=[{}]",
            self.position(), self.variant_end_position, included.join(", "), excluded.join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::vcf_variant;

    #[test]
    fn test_dump_haplotypes() {
        let template = dna::encode(b"aaaaagcaaacgtacgt");
        let first = vcf_variant(0, 3, "a", "g,t", "1/2");
        let second = vcf_variant(1, 8, "a", "g,t", "1/2");
        let mut path = HalfPath::new(&template);
        path.include(OrientedVariant::new(&first, true, 1, 2), 0).unwrap();
        path.include(OrientedVariant::new(&second, true, 1, 2), 1).unwrap();
        assert_eq!(path.dump_haplotypes(2, 10).unwrap(), "3-10 GaagcGaa|TaagcTaa");
        assert_eq!(path.dump_haplotypes(3, 7).unwrap(), "4-7 aagc|aagc");
    }

    #[test]
    fn test_decisions() {
        let template = dna::encode(b"ACGTACGTAC");
        let snp = vcf_variant(0, 2, "C", "T", "0/1");
        let deletion = vcf_variant(1, 4, "TACG", "T", "1/1");
        let mut path = HalfPath::new(&template);
        assert_eq!(path.next_variant_index(), 0);
        assert_eq!(path.position(), -1);

        let ov = OrientedVariant::new(&snp, true, 0, 1);
        assert!(path.is_new(&ov));
        path.include(ov, 0).unwrap();
        assert_eq!(path.variant_end_position(), 2);
        assert_eq!(path.next_variant_index(), 1);
        // the same allele cannot be queued twice on B
        assert!(!path.is_new(&ov));
        // but can be added to A, which has nothing queued
        assert!(path.is_new(&OrientedVariant::new(&snp, false, 1, 0)));

        path.exclude(&deletion, 1);
        assert_eq!(path.variant_end_position(), 7);
        assert_eq!(path.included_count(), 1);
        assert_eq!(path.excluded_count(), 1);
        assert_eq!(path.excluded().first().map(|v| v.id()), Some(1));

        path.step();
        path.step_haplotype(Haplotype::B);
        assert_eq!(path.compare_haplotype_positions(), Ordering::Less);
        assert_eq!(path.position(), 1);
        assert!(!path.is_on_template());
        assert_eq!(path.haplotype(Haplotype::B).nt(), dna::T);
    }

    #[test]
    fn test_ordering() {
        let template = dna::encode(b"ACGTACGTAC");
        let snp = vcf_variant(0, 2, "C", "T", "0/1");
        let base = HalfPath::new(&template);
        let mut excluded = base.clone();
        excluded.exclude(&snp, 0);
        let mut included = base.clone();
        included.include(OrientedVariant::new(&snp, true, 0, 1), 0).unwrap();
        let mut swapped = base.clone();
        swapped.include(OrientedVariant::new(&snp, false, 1, 0), 0).unwrap();

        assert!(base < excluded);
        assert!(excluded < included);
        assert!(included < swapped);
        assert_ne!(included, swapped);

        // identical playback state and decisions compare equal regardless of history
        let mut other = base.clone();
        other.exclude(&snp, 0);
        assert_eq!(excluded, other);
    }
}
