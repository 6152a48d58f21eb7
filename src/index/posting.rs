//! Posting lists mapping terms to the notes that contain them.

/// A single posting: one term's occurrences in one note.
#[derive(Debug, Clone, PartialEq)]
pub struct Posting {
    /// Note ID.
    pub note_id: u32,

    /// Term frequency in the note (content and title occurrences).
    pub frequency: u32,

    /// Ordinal token positions of the term in the note content.
    ///
    /// Title-only occurrences contribute frequency but no positions, so
    /// this can be empty for a posting with nonzero frequency.
    pub positions: Vec<u32>,

    /// Frequency multiplier applied at scoring time.
    ///
    /// 1.0 for plain content postings; raised when some occurrences are in
    /// the note title.
    pub weight: f32,
}

impl Posting {
    /// Create a posting from content positions.
    pub fn with_positions(note_id: u32, positions: Vec<u32>) -> Self {
        let frequency = positions.len() as u32;
        Posting {
            note_id,
            frequency,
            positions,
            weight: 1.0,
        }
    }

    /// Create a posting with an explicit frequency and no positions.
    pub fn with_frequency(note_id: u32, frequency: u32) -> Self {
        Posting {
            note_id,
            frequency,
            positions: Vec::new(),
            weight: 1.0,
        }
    }

    /// Set the scoring weight for this posting.
    pub fn with_weight(mut self, weight: f32) -> Self {
        self.weight = weight;
        self
    }

    /// Term frequency with the posting weight applied.
    pub fn weighted_frequency(&self) -> f32 {
        self.frequency as f32 * self.weight
    }
}

/// A posting list for one term, sorted by note ID.
///
/// Each note holds at most one posting per term. Re-adding a note replaces
/// its posting wholesale; positions from different revisions of a note are
/// never merged.
#[derive(Debug, Clone, Default)]
pub struct PostingList {
    postings: Vec<Posting>,
}

impl PostingList {
    /// Create a new empty posting list.
    pub fn new() -> Self {
        PostingList::default()
    }

    /// Insert a posting, replacing any existing posting for the same note.
    pub fn upsert(&mut self, posting: Posting) {
        match self
            .postings
            .binary_search_by_key(&posting.note_id, |p| p.note_id)
        {
            Ok(pos) => self.postings[pos] = posting,
            Err(pos) => self.postings.insert(pos, posting),
        }
    }

    /// Remove the posting for a note. Returns whether one existed.
    pub fn remove(&mut self, note_id: u32) -> bool {
        match self.postings.binary_search_by_key(&note_id, |p| p.note_id) {
            Ok(pos) => {
                self.postings.remove(pos);
                true
            }
            Err(_) => false,
        }
    }

    /// Look up the posting for a note.
    pub fn get(&self, note_id: u32) -> Option<&Posting> {
        self.postings
            .binary_search_by_key(&note_id, |p| p.note_id)
            .ok()
            .map(|pos| &self.postings[pos])
    }

    /// Number of notes containing this term.
    pub fn doc_frequency(&self) -> usize {
        self.postings.len()
    }

    /// Get the length of the posting list.
    pub fn len(&self) -> usize {
        self.postings.len()
    }

    /// Check if the posting list is empty.
    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }

    /// Get an iterator over the postings in note ID order.
    pub fn iter(&'_ self) -> std::slice::Iter<'_, Posting> {
        self.postings.iter()
    }
}
