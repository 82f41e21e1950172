//! Visitor contract for walking a parsed element tree.
//!
//! Each element calls the single visitor method matching its kind. Elements
//! do not descend on their own; [`walk`] drives the traversal in a chosen
//! [`VisitorOrder`].

use super::element::{Element, Group, Tag, Text};
use std::collections::VecDeque;

/// Visitor over [`Tag`], [`Group`] and [`Text`] elements.
///
/// Default implementations are empty, so implementors only override the
/// methods they care about.
pub trait ElementVisitor {
    fn visit_tag(&mut self, _tag: &Tag) {}
    fn visit_group(&mut self, _group: &Group) {}
    fn visit_text(&mut self, _text: &Text) {}
}

/// Traversal order used by [`walk`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VisitorOrder {
    /// The group itself, then its direct children without descending
    NonRecursive,
    /// Pre-order, in source order
    #[default]
    DepthFirst,
    /// Level by level, each level in source order
    BreadthFirst,
}

/// Visit `group` and its descendants in the given order.
pub fn walk(group: &Group, order: VisitorOrder, visitor: &mut dyn ElementVisitor) {
    match order {
        VisitorOrder::NonRecursive => {
            group.accept(visitor);
            visit_children(visitor, group.children());
        },
        VisitorOrder::DepthFirst => {
            group.accept(visitor);
            walk_depth_first(group.children(), visitor);
        },
        VisitorOrder::BreadthFirst => {
            let mut queue = VecDeque::new();
            group.accept(visitor);
            queue.push_back(group);
            while let Some(current) = queue.pop_front() {
                for child in current.children() {
                    child.accept(visitor);
                    if let Element::Group(nested) = child {
                        queue.push_back(nested);
                    }
                }
            }
        },
    }
}

/// Dispatch every element of `items` to the visitor, without descending.
pub fn visit_children(visitor: &mut dyn ElementVisitor, items: &[Element]) {
    for item in items {
        item.accept(visitor);
    }
}

fn walk_depth_first(items: &[Element], visitor: &mut dyn ElementVisitor) {
    for item in items {
        item.accept(visitor);
        if let Element::Group(nested) = item {
            walk_depth_first(nested.children(), visitor);
        }
    }
}

/// Concatenates every visited text run.
#[derive(Debug, Default)]
pub struct TextCollector {
    text: String,
}

impl TextCollector {
    #[inline]
    pub fn into_text(self) -> String {
        self.text
    }
}

impl ElementVisitor for TextCollector {
    fn visit_text(&mut self, text: &Text) {
        self.text.push_str(text.as_str());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records a compact trace of the visit order.
    #[derive(Default)]
    struct Trace(Vec<String>);

    impl ElementVisitor for Trace {
        fn visit_tag(&mut self, tag: &Tag) {
            self.0.push(format!("tag:{}", tag.full_name()));
        }

        fn visit_group(&mut self, group: &Group) {
            self.0.push(format!("group:{}", group.destination().unwrap_or("-")));
        }

        fn visit_text(&mut self, text: &Text) {
            self.0.push(format!("text:{}", text.as_str()));
        }
    }

    fn sample() -> Group {
        let mut inner = Group::new();
        inner.push(Tag::named("b"));
        inner.push(Text::new("bold"));

        let mut root = Group::new();
        root.push(Tag::new("rtf", Some("1")));
        root.push(inner);
        root.push(Text::new("tail"));
        root
    }

    #[test]
    fn test_accept_dispatches_by_kind() {
        let mut trace = Trace::default();
        Element::from(Tag::named("par")).accept(&mut trace);
        Element::from(Text::new("x")).accept(&mut trace);
        Element::from(Group::new()).accept(&mut trace);
        assert_eq!(trace.0, ["tag:par", "text:x", "group:-"]);
    }

    #[test]
    fn test_walk_non_recursive() {
        let mut trace = Trace::default();
        walk(&sample(), VisitorOrder::NonRecursive, &mut trace);
        assert_eq!(trace.0, ["group:rtf", "tag:rtf1", "group:b", "text:tail"]);
    }

    #[test]
    fn test_walk_depth_first() {
        let mut trace = Trace::default();
        walk(&sample(), VisitorOrder::DepthFirst, &mut trace);
        assert_eq!(
            trace.0,
            ["group:rtf", "tag:rtf1", "group:b", "tag:b", "text:bold", "text:tail"]
        );
    }

    #[test]
    fn test_walk_breadth_first() {
        let mut trace = Trace::default();
        walk(&sample(), VisitorOrder::BreadthFirst, &mut trace);
        assert_eq!(
            trace.0,
            ["group:rtf", "tag:rtf1", "group:b", "text:tail", "tag:b", "text:bold"]
        );
    }

    #[test]
    fn test_text_collector() {
        let mut collector = TextCollector::default();
        walk(&sample(), VisitorOrder::DepthFirst, &mut collector);
        assert_eq!(collector.into_text(), "boldtail");
    }
}
