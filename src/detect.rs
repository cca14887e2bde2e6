//! Article detection.
//!
//! Scores candidate container elements by content density and structural
//! signal, picks the best-scoring subtree as the main content, and prunes
//! boilerplate from it. Scoring walks the tree read-only; pruning happens
//! afterwards, on the winner only.

use dom_query::{Document, NodeRef, Selection};

use crate::dom;
use crate::options::ExtractOptions;
use crate::patterns::{
    ADVERTISEMENT_CLASS, BOILERPLATE_CLASS, BOILERPLATE_TAG_SELECTOR, CANDIDATE_SELECTOR,
    CONTENT_CLASS, NAVIGATION_CLASS, PARAGRAPH_TAGS,
};
use crate::pipeline::Deadline;
use crate::text::non_whitespace_len;
use crate::Result;

// Scoring weights. The unit is one non-whitespace character of
// boilerplate-free text; every other weight is expressed in that unit.

/// Base weight per character of boilerplate-free descendant text.
const TEXT_WEIGHT: i64 = 1;

/// Bonus per paragraph-like direct child. Worth roughly one short
/// sentence, so structured prose beats an equal amount of flat text.
const PARAGRAPH_BONUS: i64 = 25;

/// Bonus for semantic container tags and content-flavored class names.
/// Slightly above the paragraph bonus: an explicit `<article>` outranks
/// an anonymous wrapper with the same text.
const CONTENT_HINT_BONUS: i64 = 30;

/// Multiplier on anchor text once a candidate's link density exceeds the
/// ceiling. At 2x, a link-heavy block loses to prose of equal length.
const LINK_PENALTY_WEIGHT: i64 = 2;

/// Penalty for navigation/ad/boilerplate signals on the candidate
/// itself. An order of magnitude above the bonuses, so no amount of
/// hint signal rescues a flagged block; only long real prose can.
const BOILERPLATE_PENALTY: i64 = 500;

/// Default score floor: one paragraph bonus. A candidate that cannot
/// beat a single short paragraph of signal is not an article.
pub(crate) const MIN_CANDIDATE_SCORE: i64 = 25;

/// Default link-density ceiling before the anchor penalty applies.
/// Prose with citations stays below it; nav and tag lists sit far above.
pub(crate) const MAX_LINK_DENSITY: f64 = 0.5;

/// Blocks longer than this many non-whitespace characters are never
/// pruned for link density; reference-heavy prose is still prose.
const LINK_DENSE_TEXT_CEILING: usize = 300;

/// Tags that are boilerplate wherever they appear.
const BOILERPLATE_TAGS: &[&str] = &["nav", "aside", "footer", "header", "form"];

/// Check whether an element carries a boilerplate signal in its tag
/// name, class or id.
#[must_use]
pub fn is_boilerplate(sel: &Selection) -> bool {
    if let Some(tag) = dom::tag_name(sel) {
        if BOILERPLATE_TAGS.contains(&tag.as_str()) {
            return true;
        }
    }

    for attr in ["class", "id"] {
        if let Some(value) = dom::get_attribute(sel, attr) {
            if NAVIGATION_CLASS.is_match(&value)
                || ADVERTISEMENT_CLASS.is_match(&value)
                || BOILERPLATE_CLASS.is_match(&value)
            {
                return true;
            }
        }
    }

    false
}

/// Select the main-content subtree of the document.
///
/// With detection disabled, returns the body unchanged. With detection
/// enabled, scores every candidate container in document order and
/// returns the highest-scoring one; the strictly-greater comparison
/// makes the earliest candidate win ties. Falls back to the body when no
/// candidate reaches `min_candidate_score`.
pub fn select_content<'a>(
    doc: &'a Document,
    options: &ExtractOptions,
    max_depth: usize,
    deadline: &Deadline,
) -> Result<Selection<'a>> {
    let body = doc.select("body");
    if !options.detect_article {
        return Ok(body);
    }

    let candidates = body.select(CANDIDATE_SELECTOR);
    let mut best: Option<(NodeRef<'a>, i64)> = None;

    for node in candidates.nodes() {
        deadline.check()?;

        let sel = Selection::from(*node);
        let score = score_candidate(&sel, options, max_depth);

        if score >= options.min_candidate_score && best.is_none_or(|(_, s)| score > s) {
            best = Some((*node, score));
        }
    }

    match best {
        Some((node, score)) => {
            tracing::debug!(score, "article candidate selected");
            Ok(Selection::from(node))
        }
        None => {
            tracing::debug!("no candidate above score floor, using body");
            Ok(body)
        }
    }
}

/// Score one candidate container.
fn score_candidate(sel: &Selection, options: &ExtractOptions, max_depth: usize) -> i64 {
    // A subtree nested deeper than the bound is not worth walking.
    if depth_exceeds(sel, max_depth) {
        return 0;
    }

    let total_len = non_whitespace_len(&dom::text_content(sel));
    let clean_len = clean_text_len(sel, 0, max_depth);

    let mut score = TEXT_WEIGHT * clean_len as i64;
    score += PARAGRAPH_BONUS * paragraph_child_count(sel) as i64;

    if has_content_hint(sel) {
        score += CONTENT_HINT_BONUS;
    }

    let anchor_len = anchor_text_len(sel);
    if total_len > 0 {
        let density = anchor_len as f64 / total_len as f64;
        if density > options.max_link_density {
            score -= LINK_PENALTY_WEIGHT * anchor_len as i64;
        }
    }

    if is_boilerplate(sel) {
        score -= BOILERPLATE_PENALTY;
    }

    score
}

/// Non-whitespace text length of a subtree, boilerplate branches
/// excluded. Own text of an element is its total text minus the text of
/// its element children, which is exact for non-whitespace counts.
fn clean_text_len(sel: &Selection, depth: usize, max_depth: usize) -> usize {
    if depth > max_depth {
        return 0;
    }

    let total = non_whitespace_len(&dom::text_content(sel));
    let kids = dom::children(sel);

    let mut own = total;
    let mut clean_children = 0;
    for child in kids.iter() {
        let child_total = non_whitespace_len(&dom::text_content(&child));
        own = own.saturating_sub(child_total);
        if !is_boilerplate(&child) {
            clean_children += clean_text_len(&child, depth + 1, max_depth);
        }
    }

    own + clean_children
}

/// True when any element chain under `sel` is longer than `limit`.
fn depth_exceeds(sel: &Selection, limit: usize) -> bool {
    let kids = dom::children(sel);
    if kids.is_empty() {
        return false;
    }
    if limit == 0 {
        return true;
    }
    kids.iter().any(|child| depth_exceeds(&child, limit - 1))
}

/// Number of paragraph-like direct children.
fn paragraph_child_count(sel: &Selection) -> usize {
    dom::children(sel)
        .iter()
        .filter(|child| {
            dom::tag_name(child).is_some_and(|tag| PARAGRAPH_TAGS.contains(&tag.as_str()))
        })
        .count()
}

/// Semantic tag or content-flavored class/id.
fn has_content_hint(sel: &Selection) -> bool {
    if let Some(tag) = dom::tag_name(sel) {
        if tag == "article" || tag == "main" {
            return true;
        }
    }

    for attr in ["class", "id"] {
        if let Some(value) = dom::get_attribute(sel, attr) {
            if CONTENT_CLASS.is_match(&value) {
                return true;
            }
        }
    }

    false
}

/// Total non-whitespace length of anchor text within the subtree.
fn anchor_text_len(sel: &Selection) -> usize {
    sel.select("a")
        .iter()
        .map(|link| non_whitespace_len(&dom::text_content(&link)))
        .sum()
}

/// Remove boilerplate descendants from the selected content subtree:
/// boilerplate tags, flagged class/id names, and short link-dense
/// blocks.
pub fn prune_boilerplate(
    content: &Selection,
    options: &ExtractOptions,
    deadline: &Deadline,
) -> Result<()> {
    dom::remove(&content.select(BOILERPLATE_TAG_SELECTOR));

    for node in content.select("[class], [id]").nodes() {
        deadline.check()?;
        let sel = Selection::from(*node);
        if is_boilerplate(&sel) {
            dom::remove(&sel);
        }
    }

    for node in content.select("div, ul, ol, section, table").nodes() {
        deadline.check()?;
        let sel = Selection::from(*node);
        if is_link_dense(&sel, options.max_link_density) {
            dom::remove(&sel);
        }
    }

    Ok(())
}

/// Link-density pruning test for a block. Only short blocks qualify;
/// anchor text above the ceiling marks them as navigation.
fn is_link_dense(sel: &Selection, max_density: f64) -> bool {
    let links = sel.select("a");
    if !links.exists() {
        return false;
    }

    let total = non_whitespace_len(&dom::text_content(sel));
    if total == 0 {
        // Links with no text at all, icon rows for instance.
        return true;
    }
    if total >= LINK_DENSE_TEXT_CEILING {
        return false;
    }

    let anchor: usize = links
        .iter()
        .map(|link| non_whitespace_len(&dom::text_content(&link)))
        .sum();

    anchor as f64 / total as f64 > max_density
}
