//! Justification: stretch or squeeze one line to the bounding width.
//!
//! Pixels are inserted at (or removed from) two kinds of gap: between
//! the characters of a word, and at space nodes. For each line the
//! solver either
//!
//! - **expands** the nodes that certainly fit, or
//! - **contracts** the line after pulling in one more word,
//!
//! whichever looks better under the contraction penalty. The pixel
//! budget is split between char gaps and space gaps by weight, then
//! spread as whole pixels with the remainder handed out one pixel per
//! gap from the left.
//!
//! ```text
//! |aaa bbb ccc      |   expand  → |aaa  bbb   ccc|
//! |aaa bbb ccc d|dd     contract → |aaa bbb ccc ddd|
//! ```

use crate::layout::skip_trailing_space;
use crate::node::{NodeId, NodeKind, TextNodeList};
use crate::options::RenderOptions;

/// Which way a line is justified.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JustifyMode {
    Expand,
    Contract,
}

/// The pixel budget computed for one line.
#[derive(Clone, Copy, Debug)]
pub struct JustifyPlan {
    pub mode: JustifyMode,
    /// Signed pixels to add to the line (negative when contracting).
    pub total_pixels: i32,
    pub char_pixels: i32,
    pub space_pixels: i32,
    pub char_gaps: i32,
    pub space_gaps: i32,
    /// Last node receiving a tweak.
    pub end: NodeId,
}

/// Character gaps inside a word node, plus one if it is glued to the
/// next fragment of a crumbled word.
pub(crate) fn word_gaps(list: &TextNodeList, id: NodeId) -> i32 {
    let inner = list[id].chars().len().saturating_sub(1) as i32;
    inner + i32::from(list.is_crumbled_word(id))
}

/// Split `pixels` over `gaps`: whole pixels per gap and the remainder.
pub(crate) fn split_even(pixels: i32, gaps: i32) -> (i32, i32) {
    if gaps == 0 {
        return (0, 0);
    }
    let per_gap = pixels / gaps;
    (per_gap, pixels - per_gap * gaps)
}

/// Take one pixel of a signed remainder, moving it towards zero.
pub(crate) fn spread_one(leftover: &mut i32) -> i32 {
    match (*leftover).signum() {
        1 => {
            *leftover -= 1;
            1
        }
        -1 => {
            *leftover += 1;
            -1
        }
        _ => 0,
    }
}

/// Compute the justification budget for the line starting at `head`.
///
/// Returns `None` when the line cannot or need not be justified. That
/// is the case for the last line of a paragraph, a line without any
/// gap, and a line that already fills the width.
pub fn plan_line(
    list: &TextNodeList,
    head: NodeId,
    target: f32,
    options: &RenderOptions,
) -> Option<JustifyPlan> {
    // Nodes that certainly fit.
    let mut justifiable = false;
    let mut char_gaps = 0i32;
    let mut space_gaps = 0i32;
    let mut consumed = false;
    let mut length = 0.0f32;
    let mut expand_end = head;

    let mut cursor = Some(head);
    while let Some(id) = cursor {
        let node = &list[id];
        if node.kind == NodeKind::LineBreak {
            break;
        }
        if consumed && skip_trailing_space(list, id, length, target) {
            justifiable = true;
            break;
        }
        if length + node.length < target || !consumed {
            expand_end = id;
            match node.kind {
                NodeKind::Space => space_gaps += 1,
                NodeKind::Word => char_gaps += word_gaps(list, id),
                NodeKind::LineBreak => {}
            }
            consumed = true;
            length += node.length;
        } else {
            justifiable = true;
            break;
        }
        cursor = node.next();
    }

    if !justifiable {
        return None;
    }

    // What one more word would add.
    let mut extra_length = 0.0f32;
    let mut extra_space_gaps = 0i32;
    let mut extra_char_gaps = 0i32;
    let mut contract_end = None;

    let mut cursor = list.next(expand_end);
    while let Some(id) = cursor {
        let node = &list[id];
        match node.kind {
            NodeKind::LineBreak => break,
            NodeKind::Space => {
                extra_length += node.length;
                extra_space_gaps += 1;
            }
            NodeKind::Word => {
                contract_end = Some(id);
                extra_length += node.length;
                extra_char_gaps += node.chars().len().saturating_sub(1) as i32;
                break;
            }
        }
        cursor = node.next();
    }

    // Contraction is all or nothing: the extra word must fit entirely.
    let contract_end = contract_end.filter(|_| {
        (extra_length + length - target) * options.justify_contraction_penalty < target - length
            && (target - (length + extra_length + 1.0)) / target > -options.justify_cap_contract
    });

    let (mode, end) = match contract_end {
        Some(end) if length + extra_length > target => {
            length += extra_length + 1.0;
            char_gaps += extra_char_gaps;
            space_gaps += extra_space_gaps;
            (JustifyMode::Contract, end)
        }
        None if length < target => (JustifyMode::Expand, expand_end),
        _ => return None,
    };

    // A single glyph has nothing to spread pixels over.
    if char_gaps == 0 && space_gaps == 0 {
        return None;
    }

    let mut total_pixels = (target - length) as i32;
    match mode {
        JustifyMode::Contract => {
            if total_pixels as f32 / target < -options.justify_cap_contract {
                total_pixels = (-options.justify_cap_contract * target) as i32;
            }
        }
        JustifyMode::Expand => {
            if total_pixels as f32 / target > options.justify_cap_expand {
                total_pixels = (options.justify_cap_expand * target) as i32;
            }
        }
    }

    let (char_pixels, space_pixels) = if char_gaps == 0 {
        (0, total_pixels)
    } else if space_gaps == 0 {
        (total_pixels, 0)
    } else {
        let weight = match mode {
            JustifyMode::Contract => options.justify_character_weight_for_contract,
            JustifyMode::Expand => options.justify_character_weight_for_expand,
        };
        let mut char_pixels =
            (total_pixels as f32 * weight * char_gaps as f32 / space_gaps as f32) as i32;
        let exceeds = match mode {
            JustifyMode::Expand => char_pixels > total_pixels,
            JustifyMode::Contract => char_pixels < total_pixels,
        };
        if exceeds {
            char_pixels = total_pixels;
        }
        (char_pixels, total_pixels - char_pixels)
    };

    Some(JustifyPlan {
        mode,
        total_pixels,
        char_pixels,
        space_pixels,
        char_gaps,
        space_gaps,
        end,
    })
}

/// Justify the line starting at `head` to `target` pixels.
///
/// Writes `length_tweak` on the line's nodes only. The tweaks are
/// computed from scratch, so running this twice gives the same result.
pub fn justify_line(list: &mut TextNodeList, head: NodeId, target: f32, options: &RenderOptions) {
    let Some(plan) = plan_line(list, head, target, options) else {
        return;
    };

    log::trace!(
        "Justify {:?}: {} px ({} over {} char gaps, {} over {} spaces)",
        plan.mode,
        plan.total_pixels,
        plan.char_pixels,
        plan.char_gaps,
        plan.space_pixels,
        plan.space_gaps,
    );

    let (per_char, mut leftover_char) = split_even(plan.char_pixels, plan.char_gaps);
    let (per_space, mut leftover_space) = split_even(plan.space_pixels, plan.space_gaps);

    let mut cursor = Some(head);
    while let Some(id) = cursor {
        match list[id].kind {
            NodeKind::Space => {
                let tweak = per_space + spread_one(&mut leftover_space);
                list.set_tweak(id, tweak);
            }
            NodeKind::Word => {
                let gaps = word_gaps(list, id);
                let mut tweak = gaps * per_char;
                if leftover_char >= gaps {
                    tweak += gaps;
                    leftover_char -= gaps;
                } else if leftover_char <= -gaps {
                    tweak -= gaps;
                    leftover_char += gaps;
                } else {
                    tweak += leftover_char;
                    leftover_char = 0;
                }
                list.set_tweak(id, tweak);
            }
            NodeKind::LineBreak => {}
        }

        if id == plan.end {
            break;
        }
        cursor = list.next(id);
    }
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::Measurer;
    use crate::metrics::{FontData, Glyph, GlyphRect};
    use crate::options::Monospacing;

    /// Every lowercase letter is 10px wide; a space is 5px.
    fn font() -> FontData {
        let mut builder = FontData::builder();
        for c in 'a'..='z' {
            builder = builder.glyph(c, Glyph::new(GlyphRect::new(0, 0, 10, 12), 0, 0));
        }
        builder.build()
    }

    fn options() -> RenderOptions {
        RenderOptions {
            character_spacing: 0.0,
            word_spacing: 0.5,
            monospacing: Monospacing::No,
            ..Default::default()
        }
    }

    fn measured(text: &str, opts: &RenderOptions) -> TextNodeList {
        let font = font();
        let mut list = TextNodeList::parse(text);
        list.measure(Measurer::new(&font, opts));
        list
    }

    fn tweaks(list: &TextNodeList) -> Vec<i32> {
        list.iter().map(|(_, n)| n.length_tweak).collect()
    }

    #[test]
    fn test_expand_single_word_over_char_gaps() {
        let opts = options();
        let mut list = measured("aaa bbb ccc", &opts);
        let head = list.head().unwrap();

        let plan = plan_line(&list, head, 40.0, &opts).unwrap();
        assert_eq!(plan.mode, JustifyMode::Expand);
        assert_eq!(plan.total_pixels, 10);
        assert_eq!(plan.char_pixels, 10);

        justify_line(&mut list, head, 40.0, &opts);
        assert_eq!(tweaks(&list), vec![10, 0, 0, 0, 0]);
        assert_eq!(list[head].modified_length(), 40.0);
    }

    #[test]
    fn test_expand_splits_between_chars_and_spaces() {
        let opts = options();
        let mut list = measured("aa bb cccccc", &opts);
        let head = list.head().unwrap();

        let plan = plan_line(&list, head, 60.0, &opts).unwrap();
        assert_eq!(plan.mode, JustifyMode::Expand);
        assert_eq!(plan.total_pixels, 15);
        assert_eq!((plan.char_gaps, plan.space_gaps), (2, 1));
        // 15 * 0.08 * 2 / 1 = 2.4 -> 2
        assert_eq!((plan.char_pixels, plan.space_pixels), (2, 13));

        justify_line(&mut list, head, 60.0, &opts);
        assert_eq!(tweaks(&list), vec![1, 13, 1, 0, 0]);
    }

    #[test]
    fn test_expand_tweaks_sum_to_total_with_remainder() {
        let opts = options();
        let mut list = measured("aaaa bbbb", &opts);
        let head = list.head().unwrap();

        // 40px word in a 50px line: 10px over 3 gaps -> 3, 3, 3 + 1.
        let plan = plan_line(&list, head, 50.0, &opts).unwrap();
        justify_line(&mut list, head, 50.0, &opts);
        let sum: i32 = tweaks(&list).iter().sum();
        assert_eq!(sum, plan.total_pixels);
        assert_eq!(list[head].length_tweak, 10);
    }

    #[test]
    fn test_contract_with_negative_remainder() {
        let opts = RenderOptions {
            justify_contraction_penalty: 0.5,
            justify_cap_contract: 0.2,
            justify_character_weight_for_contract: 0.3,
            ..options()
        };
        let mut list = measured("aaaa bbbb cc", &opts);
        let head = list.head().unwrap();

        let plan = plan_line(&list, head, 100.0, &opts).unwrap();
        assert_eq!(plan.mode, JustifyMode::Contract);
        // 85 + 5 + 20 + 1 = 111 -> -11
        assert_eq!(plan.total_pixels, -11);
        assert_eq!((plan.char_pixels, plan.space_pixels), (-11, 0));

        justify_line(&mut list, head, 100.0, &opts);
        assert_eq!(tweaks(&list), vec![-6, 0, -4, 0, -1]);
        let sum: i32 = tweaks(&list).iter().sum();
        assert_eq!(sum, plan.total_pixels);
    }

    #[test]
    fn test_contraction_disfavoured_by_penalty() {
        let opts = options();
        let list = measured("aaaa bbbb cc", &opts);
        let head = list.head().unwrap();
        // (110 - 100) * 2 = 20 is not below the 15px shortfall.
        let plan = plan_line(&list, head, 100.0, &opts).unwrap();
        assert_eq!(plan.mode, JustifyMode::Expand);
        assert_eq!(plan.total_pixels, 15);
    }

    #[test]
    fn test_expand_is_capped() {
        let opts = RenderOptions {
            justify_cap_expand: 0.1,
            ..options()
        };
        let list = measured("aa bbbbbbbbbb", &opts);
        let head = list.head().unwrap();
        // 20px of 100px leaves 80px; the cap allows 10.
        let plan = plan_line(&list, head, 100.0, &opts).unwrap();
        assert_eq!(plan.total_pixels, 10);
    }

    #[test]
    fn test_last_line_is_not_justified() {
        let opts = options();
        let mut list = measured("aa bb", &opts);
        let head = list.head().unwrap();
        assert!(plan_line(&list, head, 100.0, &opts).is_none());
        justify_line(&mut list, head, 100.0, &opts);
        assert!(tweaks(&list).iter().all(|&t| t == 0));
    }

    #[test]
    fn test_line_before_break_is_not_justified() {
        let opts = options();
        let list = measured("aa\nbb cc dd", &opts);
        let head = list.head().unwrap();
        assert!(plan_line(&list, head, 100.0, &opts).is_none());
    }

    #[test]
    fn test_single_glyph_line_untouched() {
        let opts = options();
        let mut list = measured("a b", &opts);
        let head = list.head().unwrap();
        // "a" fits but "b" does not: no gaps to spread pixels over.
        assert!(plan_line(&list, head, 12.0, &opts).is_none());
        justify_line(&mut list, head, 12.0, &opts);
        assert_eq!(tweaks(&list), vec![0, 0, 0]);
    }

    #[test]
    fn test_justify_is_idempotent() {
        let opts = options();
        let mut list = measured("aa bb cccccc", &opts);
        let head = list.head().unwrap();
        justify_line(&mut list, head, 60.0, &opts);
        let first = tweaks(&list);
        justify_line(&mut list, head, 60.0, &opts);
        assert_eq!(tweaks(&list), first);
    }

    #[test]
    fn test_justify_preserves_text() {
        let opts = options();
        let mut list = measured("aa bb cccccc dd", &opts);
        let before = list.word_text();
        let head = list.head().unwrap();
        justify_line(&mut list, head, 60.0, &opts);
        assert_eq!(list.word_text(), before);
    }

    #[test]
    fn test_spread_one() {
        let mut left = 2;
        assert_eq!(spread_one(&mut left), 1);
        assert_eq!(spread_one(&mut left), 1);
        assert_eq!(spread_one(&mut left), 0);
        let mut left = -1;
        assert_eq!(spread_one(&mut left), -1);
        assert_eq!(left, 0);
    }

    #[test]
    fn test_split_even() {
        assert_eq!(split_even(10, 3), (3, 1));
        assert_eq!(split_even(-11, 7), (-1, -4));
        assert_eq!(split_even(5, 0), (0, 0));
    }
}
