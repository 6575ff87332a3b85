use std::cmp::Ordering;
use std::collections::VecDeque;

use crate::data_types::dna;
use crate::data_types::variants::Allele;

#[derive(thiserror::Error, Debug)]
pub enum PlaybackError {
    #[error("Out of order alleles during replay: allele at {start}-{end} cannot follow position {last_position}")]
    OutOfOrder { start: i64, end: i64, last_position: i64 },
    #[error("cannot move forward to {target} while inside an allele at {position}")]
    NotOnTemplate { position: i64, target: i64 },
    #[error("cannot move forward to {target} past the pending allele at {allele_start}")]
    PendingAllele { target: i64, allele_start: i64 },
    #[error("cannot move backwards from {position} to {target}")]
    Backwards { position: i64, target: i64 }
}

/// An allele as seen by the playback, clamped to the template bounds.
/// Field order matters, the derived ordering compares interval then content.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
struct PendingAllele<'a> {
    start: i64,
    end: i64,
    nt: &'a [u8]
}

/// Replays a sequence of alleles over the template, producing a haplotype one base at a time.
/// Positions are signed because the cursor starts just before the template (-1).
/// Clones are independent cursors that share the template and allele data.
#[derive(Clone, Debug)]
pub struct HaplotypePlayback<'a> {
    /// The reference template
    template: &'a [u8],
    /// Alleles that are not fully played yet; the front is the current allele when `position_in_allele` is set
    alleles: VecDeque<PendingAllele<'a>>,
    /// Current template position, the allele start while inside an allele
    template_position: i64,
    /// Offset inside the front allele, None while on the template
    position_in_allele: Option<usize>,
    /// End of the last allele accepted, nothing may be queued before it
    last_allele_end: i64,
    /// Set once a step was attempted with no output remaining
    finished: bool
}

impl<'a> HaplotypePlayback<'a> {
    /// Creates a playback positioned just before the first template base
    pub fn new(template: &'a [u8]) -> Self {
        Self {
            template,
            alleles: VecDeque::new(),
            template_position: -1,
            position_in_allele: None,
            last_allele_end: -1,
            finished: false
        }
    }

    /// Restricts an allele to the template bounds
    fn clamp_allele(&self, allele: &'a Allele) -> PendingAllele<'a> {
        let length = self.template.len();
        PendingAllele {
            start: allele.start().min(length) as i64,
            end: allele.end().min(length) as i64,
            nt: allele.nt()
        }
    }

    /// True if the allele can follow everything queued so far and would still be played
    fn accepts(&self, allele: &PendingAllele) -> bool {
        !self.finished && allele.start >= self.last_allele_end &&
            (self.position_in_allele.is_some() || allele.start > self.template_position)
    }

    /// Returns true if the allele could be queued without violating the ordering.
    /// Absent alleles and empty insertions are always accepted since they are never played.
    /// # Arguments
    /// * `allele` - the allele to test
    pub fn is_new(&self, allele: Option<&'a Allele>) -> bool {
        match allele {
            Some(a) => {
                let pending = self.clamp_allele(a);
                (pending.start == pending.end && pending.nt.is_empty()) || self.accepts(&pending)
            },
            None => true
        }
    }

    /// Queues an allele for playback.
    /// Absent alleles (e.g. REF or missing) and alleles that do not change the haplotype are ignored.
    /// # Arguments
    /// * `allele` - the allele to queue
    /// # Errors
    /// * if the allele starts before the end of the previously queued allele or before the cursor
    pub fn add_allele(&mut self, allele: Option<&'a Allele>) -> Result<(), PlaybackError> {
        let Some(allele) = allele else {
            return Ok(());
        };
        let pending = self.clamp_allele(allele);
        if pending.start == pending.end && pending.nt.is_empty() {
            // pure no-op
            return Ok(());
        }
        if !self.accepts(&pending) {
            return Err(PlaybackError::OutOfOrder {
                start: pending.start,
                end: pending.end,
                last_position: self.last_allele_end.max(self.template_position)
            });
        }
        self.last_allele_end = pending.end;
        self.alleles.push_back(pending);
        Ok(())
    }

    /// Returns true if another base can be produced given the alleles queued so far.
    /// Insertions anchored at the very end of the template still count as output.
    pub fn has_next(&self) -> bool {
        let mut pending = self.alleles.iter();
        let mut next_position = match self.position_in_allele {
            Some(offset) => {
                let Some(current) = pending.next() else {
                    return false;
                };
                if offset + 1 < current.nt.len() {
                    return true;
                }
                current.end
            },
            None => self.template_position + 1
        };

        // walk over any back-to-back deletions that would be skipped
        for allele in pending {
            if allele.start != next_position {
                break;
            }
            if !allele.nt.is_empty() {
                return true;
            }
            next_position = allele.end;
        }
        next_position < self.template.len() as i64
    }

    /// Moves the cursor by one base, entering or leaving alleles as needed.
    /// Assumes `has_next()` was true.
    fn advance(&mut self) {
        match self.position_in_allele {
            None => {
                self.template_position += 1;
                if self.alleles.front().is_some_and(|a| a.start == self.template_position) {
                    self.position_in_allele = Some(0);
                }
            },
            Some(offset) => self.position_in_allele = Some(offset + 1)
        }

        // leave any finished alleles, possibly entering the next one immediately
        while let (Some(offset), Some(current)) = (self.position_in_allele, self.alleles.front()) {
            if offset < current.nt.len() {
                break;
            }
            self.template_position = current.end;
            self.position_in_allele = None;
            self.alleles.pop_front();
            if self.alleles.front().is_some_and(|a| a.start == self.template_position) {
                self.position_in_allele = Some(0);
            }
        }
    }

    /// The base at the cursor; UNKNOWN before the first step
    pub fn nt(&self) -> u8 {
        match (self.position_in_allele, self.alleles.front()) {
            (Some(offset), Some(current)) => current.nt[offset],
            _ => usize::try_from(self.template_position).ok()
                .and_then(|p| self.template.get(p))
                .copied()
                .unwrap_or(dna::UNKNOWN)
        }
    }

    /// Advances one base and returns it, or marks the playback as finished when no output remains
    pub fn next_base(&mut self) -> Option<u8> {
        if self.finished || !self.has_next() {
            self.finished = true;
            return None;
        }
        self.advance();
        Some(self.nt())
    }

    /// Advances one base if possible, otherwise marks the playback as finished
    pub fn step(&mut self) {
        let _ = self.next_base();
    }

    /// Fast-forwards to a template position without emitting the skipped bases.
    /// # Arguments
    /// * `position` - the template position to land on
    /// # Errors
    /// * if the cursor is inside an allele
    /// * if a queued allele starts before `position`
    /// * if `position` is behind the cursor
    pub fn move_forward(&mut self, position: i64) -> Result<(), PlaybackError> {
        if !self.is_on_template() {
            return Err(PlaybackError::NotOnTemplate { position: self.template_position, target: position });
        }
        if position < self.template_position {
            return Err(PlaybackError::Backwards { position: self.template_position, target: position });
        }
        if let Some(front) = self.alleles.front() {
            if front.start < position {
                return Err(PlaybackError::PendingAllele { target: position, allele_start: front.start });
            }
        }
        self.template_position = position - 1;
        self.advance();
        Ok(())
    }

    /// Returns true when no further allele bases are waiting to be played, meaning that variants overlapping
    /// what was already committed should be queued before stepping further.
    pub fn wants_future_variant_bases(&self) -> bool {
        let mut queued = self.alleles.iter();
        match self.position_in_allele {
            Some(offset) => {
                if queued.next().is_some_and(|current| offset + 1 < current.nt.len()) {
                    return false;
                }
            },
            None => {
                if queued.next().is_none() {
                    return true;
                }
            }
        }
        queued.all(|a| a.nt.is_empty())
    }

    /// True if two playbacks agree at the current step: both finished, or neither and the same base.
    pub fn matches(&self, other: &HaplotypePlayback) -> bool {
        self.finished == other.finished && (self.finished || self.nt() == other.nt())
    }

    /// The span of the allele being played, if any
    pub fn current_allele_span(&self) -> Option<(i64, i64)> {
        self.position_in_allele
            .and(self.alleles.front())
            .map(|a| (a.start, a.end))
    }

    // getters
    pub fn template_position(&self) -> i64 {
        self.template_position
    }

    pub fn position_in_allele(&self) -> Option<usize> {
        self.position_in_allele
    }

    pub fn is_on_template(&self) -> bool {
        self.position_in_allele.is_none()
    }

    pub fn finished(&self) -> bool {
        self.finished
    }

    pub fn template(&self) -> &'a [u8] {
        self.template
    }
}

impl PartialEq for HaplotypePlayback<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HaplotypePlayback<'_> {}

impl PartialOrd for HaplotypePlayback<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HaplotypePlayback<'_> {
    /// Position first, then the offset inside the current allele, then the queued alleles by interval and content
    fn cmp(&self, other: &Self) -> Ordering {
        self.template_position.cmp(&other.template_position)
            .then(self.finished.cmp(&other.finished))
            .then(self.position_in_allele.cmp(&other.position_in_allele))
            .then_with(|| self.alleles.cmp(&other.alleles))
    }
}
