//! Gallery layout planning.
//!
//! Turns an ordered list of [`ContentItem`]s into an ordered list of
//! [`Placement`]s: each item paired with a [`SpanClass`] telling the grid how
//! many tracks it occupies. The planner knows nothing about rendering; span
//! classes are opaque tokens for the presentation layer.
//!
//! ## Orientation
//!
//! An item is **landscape** iff `width >= height`, otherwise **portrait**.
//! Squares (and the degenerate `0×0`) therefore count as landscape.
//!
//! ## Strategies
//!
//! ### Bento (category browse)
//!
//! ```text
//! input    P1 L1 P2 P3 L2 P4 P5 P6 P7 L3 L4
//! V        P1 P2 P3 P4 P5 P6          first 6 portraits
//! H        L1 L2 L3                   first 3 landscapes
//! R        P7 L4                      everything else, original order
//! output   V ++ H ++ R
//! ```
//!
//! Spans are then assigned walking the output: a landscape is full width;
//! each run of consecutive portraits is cut into groups of three. A full
//! group is three thirds, a pair is a third plus two thirds, a single
//! leftover portrait is full width.
//!
//! ### Full width (project detail)
//!
//! No reordering. Landscapes are full width, portraits half width.
//!
//! Both strategies are pure functions of their input.

use crate::types::ContentItem;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Portraits pulled to the front by the bento strategy.
const BENTO_LEAD_PORTRAITS: usize = 6;
/// Landscapes placed right after the leading portraits.
const BENTO_LEAD_LANDSCAPES: usize = 3;
/// Portrait runs are chunked into groups of this size.
const PORTRAIT_GROUP: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Landscape,
    Portrait,
}

impl Orientation {
    /// Ties go to landscape.
    pub fn classify(width: u32, height: u32) -> Self {
        if width >= height {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        }
    }

    pub fn of(item: &ContentItem) -> Self {
        Self::classify(item.width, item.height)
    }
}

/// How much of the grid row an item takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpanClass {
    #[serde(rename = "span-full")]
    Full,
    #[serde(rename = "span-half")]
    Half,
    #[serde(rename = "span-third")]
    Third,
    #[serde(rename = "span-two-thirds")]
    TwoThirds,
}

impl SpanClass {
    /// The token handed to the presentation layer.
    pub fn token(self) -> &'static str {
        match self {
            SpanClass::Full => "span-full",
            SpanClass::Half => "span-half",
            SpanClass::Third => "span-third",
            SpanClass::TwoThirds => "span-two-thirds",
        }
    }
}

impl fmt::Display for SpanClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Selectable arrangement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutStrategy {
    /// Reordering bento grid used for browsing photos.
    #[default]
    Bento,
    /// Original order, full/half widths; used on project pages.
    FullWidth,
}

impl fmt::Display for LayoutStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutStrategy::Bento => f.write_str("bento"),
            LayoutStrategy::FullWidth => f.write_str("full-width"),
        }
    }
}

/// One item with its layout directive, for a single render pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Placement<'a> {
    pub item: &'a ContentItem,
    pub span: SpanClass,
}

/// Owned form of [`Placement`] for serialization into manifests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedItem {
    #[serde(flatten)]
    pub item: ContentItem,
    pub span: SpanClass,
}

impl From<Placement<'_>> for PlacedItem {
    fn from(p: Placement<'_>) -> Self {
        Self {
            item: p.item.clone(),
            span: p.span,
        }
    }
}

/// Plan a gallery with the given strategy.
pub fn plan(items: &[ContentItem], strategy: LayoutStrategy) -> Vec<Placement<'_>> {
    match strategy {
        LayoutStrategy::Bento => plan_bento(items),
        LayoutStrategy::FullWidth => plan_full_width(items),
    }
}

/// Reordering bento strategy: reorder, then assign spans.
pub fn plan_bento(items: &[ContentItem]) -> Vec<Placement<'_>> {
    let ordered = bento_order(items);
    let orientations: Vec<Orientation> = ordered.iter().map(|i| Orientation::of(i)).collect();
    let spans = bento_spans(&orientations);
    ordered
        .into_iter()
        .zip(spans)
        .map(|(item, span)| Placement { item, span })
        .collect()
}

/// Simple strategy: original order, landscape full, portrait half.
pub fn plan_full_width(items: &[ContentItem]) -> Vec<Placement<'_>> {
    items
        .iter()
        .map(|item| Placement {
            item,
            span: match Orientation::of(item) {
                Orientation::Landscape => SpanClass::Full,
                Orientation::Portrait => SpanClass::Half,
            },
        })
        .collect()
}

/// The bento output order: leading portraits, then leading landscapes,
/// then the rest in original order.
pub fn bento_order(items: &[ContentItem]) -> Vec<&ContentItem> {
    let mut taken = vec![false; items.len()];
    let mut lead_portraits = Vec::with_capacity(BENTO_LEAD_PORTRAITS);
    let mut lead_landscapes = Vec::with_capacity(BENTO_LEAD_LANDSCAPES);

    for (i, item) in items.iter().enumerate() {
        if lead_portraits.len() == BENTO_LEAD_PORTRAITS {
            break;
        }
        if Orientation::of(item) == Orientation::Portrait {
            taken[i] = true;
            lead_portraits.push(item);
        }
    }
    for (i, item) in items.iter().enumerate() {
        if lead_landscapes.len() == BENTO_LEAD_LANDSCAPES {
            break;
        }
        if !taken[i] && Orientation::of(item) == Orientation::Landscape {
            taken[i] = true;
            lead_landscapes.push(item);
        }
    }

    let rest = items
        .iter()
        .zip(&taken)
        .filter(|(_, taken)| !**taken)
        .map(|(item, _)| item);

    lead_portraits
        .into_iter()
        .chain(lead_landscapes)
        .chain(rest)
        .collect()
}

/// Span assignment over an already-ordered orientation sequence.
pub fn bento_spans(orientations: &[Orientation]) -> Vec<SpanClass> {
    let mut spans = Vec::with_capacity(orientations.len());
    let mut i = 0;
    while i < orientations.len() {
        if orientations[i] == Orientation::Landscape {
            spans.push(SpanClass::Full);
            i += 1;
            continue;
        }
        let run_len = orientations[i..]
            .iter()
            .take_while(|o| **o == Orientation::Portrait)
            .count();
        for chunk_start in (0..run_len).step_by(PORTRAIT_GROUP) {
            let chunk = (run_len - chunk_start).min(PORTRAIT_GROUP);
            spans.extend_from_slice(portrait_chunk_spans(chunk));
        }
        i += run_len;
    }
    spans
}

fn portrait_chunk_spans(len: usize) -> &'static [SpanClass] {
    match len {
        1 => &[SpanClass::Full],
        2 => &[SpanClass::Third, SpanClass::TwoThirds],
        _ => &[SpanClass::Third, SpanClass::Third, SpanClass::Third],
    }
}
