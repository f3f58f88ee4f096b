//! Predicate building.
//!
//! A [`QueryPlan`] is derived from a [`FilterSet`] in one pass and never mutated
//! afterwards. Every predicate carries a fixed SQL fragment with exactly one `?`
//! placeholder; filter values only ever travel as bound parameters.

use crate::{FilterSet, SearchMode};

/// One WHERE-clause fragment and the parameter bound to its placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    pub condition: &'static str,
    pub param: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, Copy)]
enum Matching {
    /// `MATCH ... AGAINST ... IN BOOLEAN MODE`; operators in the value pass through.
    FullText,
    /// `LIKE %value%`; `%` and `_` in the value keep their wildcard meaning.
    Substring,
}

#[derive(Debug, Clone, Copy)]
struct PredicateRule {
    condition: &'static str,
    param: &'static str,
    matching: Matching,
}

impl PredicateRule {
    fn bind(&self, value: &str) -> Predicate {
        let value = match self.matching {
            Matching::FullText => value.to_string(),
            Matching::Substring => format!("%{value}%"),
        };
        Predicate {
            condition: self.condition,
            param: self.param,
            value,
        }
    }
}

const MUSIC_TITLE: PredicateRule = PredicateRule {
    condition: "MATCH( titles_distinct.title ) AGAINST( ? IN BOOLEAN MODE )",
    param: ":title",
    matching: Matching::FullText,
};

const MUSIC_COMPOSER: PredicateRule = PredicateRule {
    condition: "titles.composer LIKE ?",
    param: ":composer",
    matching: Matching::Substring,
};

const MUSIC_LYRICIST: PredicateRule = PredicateRule {
    condition: "titles.lyricist LIKE ?",
    param: ":lyricist",
    matching: Matching::Substring,
};

const MUSIC_ARTIST: PredicateRule = PredicateRule {
    condition: "titles_distinct.title IN ( SELECT title FROM audio_files WHERE MATCH( artist ) AGAINST( ? IN BOOLEAN MODE ) )",
    param: ":artist",
    matching: Matching::FullText,
};

const MUSIC_ALBUM: PredicateRule = PredicateRule {
    condition: "titles_distinct.title IN ( SELECT title FROM audio_files WHERE MATCH( album ) AGAINST( ? IN BOOLEAN MODE ) )",
    param: ":album",
    matching: Matching::FullText,
};

const AUDIO_TITLE: PredicateRule = PredicateRule {
    condition: "MATCH( title ) AGAINST( ? IN BOOLEAN MODE )",
    param: ":title",
    matching: Matching::FullText,
};

const AUDIO_ARTIST: PredicateRule = PredicateRule {
    condition: "MATCH( artist ) AGAINST( ? IN BOOLEAN MODE )",
    param: ":artist",
    matching: Matching::FullText,
};

const AUDIO_ALBUM: PredicateRule = PredicateRule {
    condition: "MATCH( album ) AGAINST( ? IN BOOLEAN MODE )",
    param: ":album",
    matching: Matching::FullText,
};

/// Table family a plan reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Catalog {
    Titles,
    Recordings,
}

/// Ordered predicates plus the join decision for one search.
///
/// Only [`QueryPlan::music`] and [`QueryPlan::audio`] build plans, so a plan
/// always targets one of the two searchable catalogs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPlan {
    catalog: Catalog,
    predicates: Vec<Predicate>,
    aa_flag: bool,
    limit: u64,
}

impl QueryPlan {
    /// Plan for `music-search` over titles, their source books and (optionally) recordings.
    pub fn music(filters: &FilterSet) -> Self {
        let candidates = [
            (&filters.title, MUSIC_TITLE),
            (&filters.composer, MUSIC_COMPOSER),
            (&filters.lyricist, MUSIC_LYRICIST),
            (&filters.artist, MUSIC_ARTIST),
            (&filters.album, MUSIC_ALBUM),
        ];

        Self {
            catalog: Catalog::Titles,
            predicates: collect_predicates(&candidates),
            aa_flag: filters.has_recording_filter(),
            limit: filters.limit,
        }
    }

    /// Plan for `audio-search`; composer and lyricist do not apply to recordings.
    pub fn audio(filters: &FilterSet) -> Self {
        let candidates = [
            (&filters.title, AUDIO_TITLE),
            (&filters.artist, AUDIO_ARTIST),
            (&filters.album, AUDIO_ALBUM),
        ];

        Self {
            catalog: Catalog::Recordings,
            predicates: collect_predicates(&candidates),
            aa_flag: false,
            limit: filters.limit,
        }
    }

    pub fn mode(&self) -> SearchMode {
        match self.catalog {
            Catalog::Titles => SearchMode::MusicSearch,
            Catalog::Recordings => SearchMode::AudioSearch,
        }
    }

    pub(crate) fn catalog(&self) -> Catalog {
        self.catalog
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// Artist or album filters are present: the recordings table is inner-joined
    /// and `artist, album` are selected and returned.
    pub fn aa_flag(&self) -> bool {
        self.aa_flag
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    pub fn is_unfiltered(&self) -> bool {
        self.predicates.is_empty()
    }
}

fn collect_predicates(candidates: &[(&Option<String>, PredicateRule)]) -> Vec<Predicate> {
    candidates
        .iter()
        .filter_map(|(value, spec)| value.as_deref().map(|v| spec.bind(v)))
        .collect()
}
