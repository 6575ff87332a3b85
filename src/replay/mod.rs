/*!
# Haplotype replay
Replays chosen alleles over a template to produce haplotypes one base at a time.
A `HaplotypePlayback` is a single cursor over one haplotype, and a `HalfPath` pairs two of them (A and B) with the variant decisions made so far for one side of the comparison.

```
use haplosync::data_types::dna;
use haplosync::data_types::variants::Allele;
use haplosync::replay::haplotype_playback::HaplotypePlayback;

let template = dna::encode(b"ACGT");
let snp = Allele::new(1, 2, vec![dna::T]).unwrap();
let mut playback = HaplotypePlayback::new(&template);
playback.add_allele(Some(&snp)).unwrap();
let mut haplotype = vec![];
while let Some(nt) = playback.next_base() {
    haplotype.push(nt);
}
assert_eq!(dna::decode(&haplotype), "ATGT");
```
*/

/// Paired haplotype playbacks with their variant decisions
pub mod half_path;
/// Single haplotype cursor over a template
pub mod haplotype_playback;
