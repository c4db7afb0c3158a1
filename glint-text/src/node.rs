//! Text nodes: the units of layout.
//!
//! A paragraph is tokenized into an ordered list of `Word`, `Space`
//! and `LineBreak` nodes. Nodes live in a slot-map arena and link to
//! their neighbours by [`NodeId`], so a word can be split in place
//! ("crumbled") without touching the rest of the list.
//!
//! ```text
//! "to be\nor"  ──►  [to] [ ] [be] [⏎] [or]
//!
//! crumble([toolong], 1)
//!   [toolong] ──► [too][long] ──► [t][oo][lo][ng] ──► [t][o][o][l][o][n][g]
//! ```

use std::ops::Index;

use slotmap::{new_key_type, SlotMap};

use crate::measure::Measurer;
use crate::metrics::GlyphMetrics;

new_key_type! { pub struct NodeId; }

/// Kind of a text node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Word,
    Space,
    LineBreak,
}

/// A word, a single whitespace character, or a line break.
#[derive(Clone, Debug)]
pub struct TextNode {
    pub kind: NodeKind,
    text: String,
    chars: Vec<char>,
    /// Natural width in pixels.
    pub length: f32,
    /// Signed pixel adjustment applied by justification.
    pub length_tweak: i32,
    prev: Option<NodeId>,
    next: Option<NodeId>,
}

impl TextNode {
    fn new(kind: NodeKind, text: String) -> Self {
        let chars = text.chars().collect();
        Self {
            kind,
            text,
            chars,
            length: 0.0,
            length_tweak: 0,
            prev: None,
            next: None,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// Width after the justification tweak.
    pub fn modified_length(&self) -> f32 {
        self.length + self.length_tweak as f32
    }

    pub fn prev(&self) -> Option<NodeId> {
        self.prev
    }

    pub fn next(&self) -> Option<NodeId> {
        self.next
    }
}

// ── Node list ───────────────────────────────────────────────────────

/// Ordered, owned list of text nodes.
#[derive(Clone, Debug, Default)]
pub struct TextNodeList {
    arena: SlotMap<NodeId, TextNode>,
    head: Option<NodeId>,
    tail: Option<NodeId>,
}

impl TextNodeList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tokenize `text` into words, spaces and line breaks.
    ///
    /// `\r\n` counts as one break; every other `\r` or `\n` is a break
    /// of its own. Each whitespace character becomes its own space node.
    pub fn parse(text: &str) -> Self {
        let mut list = Self::new();
        let normalized = text.replace("\r\n", "\r");
        let mut word = String::new();

        for c in normalized.chars() {
            if c == '\r' || c == '\n' {
                list.flush_word(&mut word);
                list.push_back(NodeKind::LineBreak, String::new());
            } else if c.is_whitespace() {
                list.flush_word(&mut word);
                list.push_back(NodeKind::Space, c.to_string());
            } else {
                word.push(c);
            }
        }
        list.flush_word(&mut word);
        list
    }

    fn flush_word(&mut self, word: &mut String) {
        if !word.is_empty() {
            self.push_back(NodeKind::Word, std::mem::take(word));
        }
    }

    /// Append a node at the tail.
    pub fn push_back(&mut self, kind: NodeKind, text: String) -> NodeId {
        let mut node = TextNode::new(kind, text);
        node.prev = self.tail;
        let id = self.arena.insert(node);
        match self.tail {
            Some(tail) => self.arena[tail].next = Some(id),
            None => self.head = Some(id),
        }
        self.tail = Some(id);
        id
    }

    pub fn head(&self) -> Option<NodeId> {
        self.head
    }

    pub fn tail(&self) -> Option<NodeId> {
        self.tail
    }

    pub fn get(&self, id: NodeId) -> Option<&TextNode> {
        self.arena.get(id)
    }

    pub fn next(&self, id: NodeId) -> Option<NodeId> {
        self.arena.get(id).and_then(|n| n.next)
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Nodes in order, head to tail.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            list: self,
            cursor: self.head,
        }
    }

    /// Concatenated text of all word nodes.
    pub fn word_text(&self) -> String {
        self.iter()
            .filter(|(_, n)| n.kind == NodeKind::Word)
            .map(|(_, n)| n.text())
            .collect()
    }

    /// A word directly followed by another word is a fragment of a
    /// crumbled word; the two are glued by one extra character gap.
    pub fn is_crumbled_word(&self, id: NodeId) -> bool {
        let node = &self[id];
        node.kind == NodeKind::Word
            && node
                .next
                .and_then(|next| self.arena.get(next))
                .is_some_and(|next| next.kind == NodeKind::Word)
    }

    /// First character of the word fragment following `id`, if any.
    pub fn next_word_head(&self, id: NodeId) -> Option<char> {
        let next = &self[self[id].next?];
        if next.kind == NodeKind::Word {
            next.chars.first().copied()
        } else {
            None
        }
    }

    /// Measure every node's natural length.
    pub fn measure<M: GlyphMetrics + ?Sized>(&mut self, measurer: Measurer<'_, M>) {
        let mut cursor = self.head;
        while let Some(id) = cursor {
            let length = match self[id].kind {
                NodeKind::Space => measurer.space_width(),
                NodeKind::Word => measurer.word_width(&self[id].chars, self.next_word_head(id)),
                NodeKind::LineBreak => 0.0,
            };
            let node = &mut self.arena[id];
            node.length = length;
            cursor = node.next;
        }
    }

    /// Zero every node's justification tweak.
    pub fn reset_tweaks(&mut self) {
        for node in self.arena.values_mut() {
            node.length_tweak = 0;
        }
    }

    pub(crate) fn set_tweak(&mut self, id: NodeId, tweak: i32) {
        if let Some(node) = self.arena.get_mut(id) {
            node.length_tweak = tweak;
        }
    }

    /// Crumble every word at least `max_width` wide into single
    /// characters. Returns how many words were crumbled.
    ///
    /// Lengths of the new fragments are zero until the list is measured
    /// again.
    pub fn crumble_overflowing(&mut self, max_width: f32) -> usize {
        let overflowing: Vec<NodeId> = self
            .iter()
            .filter(|(_, n)| n.kind == NodeKind::Word && n.length >= max_width && n.chars.len() > 1)
            .map(|(id, _)| id)
            .collect();

        for &id in &overflowing {
            self.crumble(id, 1);
        }
        overflowing.len()
    }

    /// Split a word in halves recursively until every fragment has at
    /// most `base_case` characters.
    pub fn crumble(&mut self, id: NodeId, base_case: usize) {
        let Some(node) = self.arena.get(id) else {
            return;
        };
        if node.kind != NodeKind::Word || node.chars.len() <= base_case.max(1) {
            return;
        }
        if let Some((left, right)) = self.split(id) {
            self.crumble(left, base_case);
            self.crumble(right, base_case);
        }
    }

    /// Replace a word node by two halves, returning their ids.
    fn split(&mut self, id: NodeId) -> Option<(NodeId, NodeId)> {
        let node = self.arena.remove(id)?;
        let mid = node.chars.len() / 2;
        let left_text: String = node.chars[..mid].iter().collect();
        let right_text: String = node.chars[mid..].iter().collect();

        let mut left = TextNode::new(NodeKind::Word, left_text);
        let mut right = TextNode::new(NodeKind::Word, right_text);
        left.prev = node.prev;
        right.next = node.next;

        let left_id = self.arena.insert(left);
        let right_id = self.arena.insert(right);
        self.arena[left_id].next = Some(right_id);
        self.arena[right_id].prev = Some(left_id);

        match node.prev {
            Some(prev) => self.arena[prev].next = Some(left_id),
            None => self.head = Some(left_id),
        }
        match node.next {
            Some(next) => self.arena[next].prev = Some(right_id),
            None => self.tail = Some(right_id),
        }
        Some((left_id, right_id))
    }
}

impl Index<NodeId> for TextNodeList {
    type Output = TextNode;

    fn index(&self, id: NodeId) -> &TextNode {
        &self.arena[id]
    }
}

/// Iterator over `(NodeId, &TextNode)` in list order.
pub struct Iter<'a> {
    list: &'a TextNodeList,
    cursor: Option<NodeId>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (NodeId, &'a TextNode);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.cursor?;
        let node = self.list.arena.get(id)?;
        self.cursor = node.next;
        Some((id, node))
    }
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{FontData, Glyph, GlyphRect};
    use crate::options::{Monospacing, RenderOptions};

    fn kinds(list: &TextNodeList) -> Vec<NodeKind> {
        list.iter().map(|(_, n)| n.kind).collect()
    }

    fn texts(list: &TextNodeList) -> Vec<String> {
        list.iter().map(|(_, n)| n.text().to_string()).collect()
    }

    fn font() -> FontData {
        let mut builder = FontData::builder();
        for c in 'a'..='z' {
            builder = builder.glyph(c, Glyph::new(GlyphRect::new(0, 0, 10, 10), 0, 0));
        }
        builder.kerning('a', 'b', -2).build()
    }

    /// Proportional advances; the fixture font would otherwise count as
    /// naturally monospaced.
    fn exact() -> RenderOptions {
        RenderOptions {
            character_spacing: 0.0,
            word_spacing: 0.5,
            monospacing: Monospacing::No,
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_words_and_spaces() {
        let list = TextNodeList::parse("The quick fox");
        assert_eq!(
            kinds(&list),
            vec![NodeKind::Word, NodeKind::Space, NodeKind::Word, NodeKind::Space, NodeKind::Word]
        );
        assert_eq!(texts(&list), vec!["The", " ", "quick", " ", "fox"]);
    }

    #[test]
    fn test_parse_line_breaks() {
        let list = TextNodeList::parse("a\r\nb\nc\rd");
        assert_eq!(
            kinds(&list),
            vec![
                NodeKind::Word,
                NodeKind::LineBreak,
                NodeKind::Word,
                NodeKind::LineBreak,
                NodeKind::Word,
                NodeKind::LineBreak,
                NodeKind::Word,
            ]
        );
    }

    #[test]
    fn test_parse_consecutive_spaces() {
        let list = TextNodeList::parse("a  b");
        assert_eq!(list.len(), 4);
        assert_eq!(kinds(&list)[1..3], [NodeKind::Space, NodeKind::Space]);
    }

    #[test]
    fn test_parse_empty() {
        let list = TextNodeList::parse("");
        assert!(list.is_empty());
        assert!(list.head().is_none());
        assert!(list.tail().is_none());
    }

    #[test]
    fn test_measure_lengths() {
        let mut list = TextNodeList::parse("ab cd");
        let font = font();
        let opts = exact();
        list.measure(Measurer::new(&font, &opts));
        let lengths: Vec<f32> = list.iter().map(|(_, n)| n.length).collect();
        // "ab" = 10 - 2 (kerning) + 10, space = 10 * 0.5
        assert_eq!(lengths, vec![18.0, 5.0, 20.0]);
    }

    #[test]
    fn test_measure_natural_monospacing() {
        let mut list = TextNodeList::parse("ab cd");
        let font = font();
        assert!(font.is_naturally_monospaced());
        let opts = RenderOptions {
            monospacing: Monospacing::Natural,
            ..exact()
        };
        list.measure(Measurer::new(&font, &opts));
        let lengths: Vec<f32> = list.iter().map(|(_, n)| n.length).collect();
        // Mono width ceil(1 + 10) = 11 for every character and the space.
        assert_eq!(lengths, vec![22.0, 11.0, 22.0]);
    }

    #[test]
    fn test_measure_skips_unmapped_characters() {
        let mut list = TextNodeList::parse("a?b");
        let font = font();
        let opts = exact();
        list.measure(Measurer::new(&font, &opts));
        let head = list.head().unwrap();
        assert_eq!(list[head].length, 20.0);
    }

    #[test]
    fn test_crumble_to_single_characters() {
        let mut list = TextNodeList::parse("x abcdefg y");
        let word = list.iter().nth(2).map(|(id, _)| id).unwrap();
        list.crumble(word, 1);

        assert_eq!(list.len(), 11);
        assert_eq!(texts(&list), vec!["x", " ", "a", "b", "c", "d", "e", "f", "g", " ", "y"]);
        assert_eq!(list.word_text(), "xabcdefgy");
        // Links survive in both directions.
        let tail = list.tail().unwrap();
        assert_eq!(list[tail].text(), "y");
        let g = list[list[tail].prev().unwrap()].prev().unwrap();
        assert_eq!(list[g].text(), "g");
    }

    #[test]
    fn test_crumble_head_and_tail() {
        let mut list = TextNodeList::parse("abcd");
        let head = list.head().unwrap();
        list.crumble(head, 1);
        assert_eq!(texts(&list), vec!["a", "b", "c", "d"]);
        assert_eq!(list[list.head().unwrap()].text(), "a");
        assert_eq!(list[list.tail().unwrap()].text(), "d");
    }

    #[test]
    fn test_crumble_overflowing_is_idempotent() {
        let font = font();
        let opts = exact();
        let mut list = TextNodeList::parse("ab longword cd");
        list.measure(Measurer::new(&font, &opts));

        assert_eq!(list.crumble_overflowing(50.0), 1);
        list.measure(Measurer::new(&font, &opts));
        let count = list.len();

        assert_eq!(list.crumble_overflowing(50.0), 0);
        assert_eq!(list.len(), count);
    }

    #[test]
    fn test_crumbled_word_detection() {
        let font = font();
        let opts = exact();
        let mut list = TextNodeList::parse("abc d");
        let head = list.head().unwrap();
        list.crumble(head, 1);
        list.measure(Measurer::new(&font, &opts));

        let ids: Vec<NodeId> = list.iter().map(|(id, _)| id).collect();
        assert!(list.is_crumbled_word(ids[0]));
        assert!(list.is_crumbled_word(ids[1]));
        assert!(!list.is_crumbled_word(ids[2])); // followed by a space
        assert!(!list.is_crumbled_word(ids[3]));
        // Kerning applies across the fragment boundary: "a" -> "b".
        assert_eq!(list[ids[0]].length, 8.0);
    }

    #[test]
    fn test_reset_tweaks() {
        let mut list = TextNodeList::parse("a b");
        let head = list.head().unwrap();
        list.set_tweak(head, 4);
        assert_eq!(list[head].length_tweak, 4);
        list.reset_tweaks();
        assert_eq!(list[head].length_tweak, 0);
    }
}
