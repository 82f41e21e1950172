//! RTF element tree.
//!
//! A parsed document is a tree of [`Group`]s holding [`Tag`]s (control words
//! and control symbols), [`Text`] runs and nested groups. Elements compare
//! and hash by value, recursively for groups.

use super::keywords;
use super::visitor::ElementVisitor;
use std::fmt;

/// Kind of an [`Element`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// Control word or control symbol
    Tag,
    /// Brace-delimited group
    Group,
    /// Decoded literal text
    Text,
}

/// A node of the element tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Element {
    Tag(Tag),
    Group(Group),
    Text(Text),
}

impl Element {
    /// Kind of this element.
    #[inline]
    pub fn kind(&self) -> ElementKind {
        match self {
            Element::Tag(_) => ElementKind::Tag,
            Element::Group(_) => ElementKind::Group,
            Element::Text(_) => ElementKind::Text,
        }
    }

    /// Dispatch to the visitor method matching this element's kind.
    #[inline]
    pub fn accept(&self, visitor: &mut dyn ElementVisitor) {
        match self {
            Element::Tag(tag) => tag.accept(visitor),
            Element::Group(group) => group.accept(visitor),
            Element::Text(text) => text.accept(visitor),
        }
    }

    #[inline]
    pub fn as_tag(&self) -> Option<&Tag> {
        match self {
            Element::Tag(tag) => Some(tag),
            _ => None,
        }
    }

    #[inline]
    pub fn as_group(&self) -> Option<&Group> {
        match self {
            Element::Group(group) => Some(group),
            _ => None,
        }
    }

    #[inline]
    pub fn as_text(&self) -> Option<&Text> {
        match self {
            Element::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl From<Tag> for Element {
    fn from(tag: Tag) -> Self {
        Element::Tag(tag)
    }
}

impl From<Group> for Element {
    fn from(group: Group) -> Self {
        Element::Group(group)
    }
}

impl From<Text> for Element {
    fn from(text: Text) -> Self {
        Element::Text(text)
    }
}

/// A control word (`\f0`) or control symbol (`\~`).
///
/// The numeric argument is kept verbatim as text; [`Tag::value_as_number`]
/// is its signed base-10 interpretation, absent when it does not fit an `i32`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tag {
    full_name: String,
    name: String,
    value: Option<String>,
    value_as_number: Option<i32>,
}

impl Tag {
    /// Create a tag from its name and optional argument text.
    pub fn new(name: impl Into<String>, value: Option<&str>) -> Self {
        let name = name.into();
        let value = value.filter(|v| !v.is_empty()).map(str::to_owned);
        let full_name = match &value {
            Some(v) => {
                let mut full = String::with_capacity(name.len() + v.len());
                full.push_str(&name);
                full.push_str(v);
                full
            },
            None => name.clone(),
        };
        let value_as_number = value.as_deref().and_then(|v| v.parse::<i32>().ok());

        Self {
            full_name,
            name,
            value,
            value_as_number,
        }
    }

    /// Create a tag without an argument.
    #[inline]
    pub fn named(name: impl Into<String>) -> Self {
        Self::new(name, None)
    }

    /// Split a full control word such as `"fs24"` or `"li-360"` into name and
    /// argument.
    pub fn from_full_name(full_name: &str) -> Self {
        let split = full_name
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(full_name.len());
        if split == 0 {
            // Control symbol: the whole text is the name.
            return Self::named(full_name);
        }
        let (name, value) = full_name.split_at(split);
        Self::new(name, Some(value))
    }

    /// Name and argument text, e.g. `"f0"`.
    #[inline]
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Name without argument, e.g. `"f"`.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Argument text, if any.
    #[inline]
    pub fn value_as_text(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Argument as a signed integer, if present and representable.
    #[inline]
    pub fn value_as_number(&self) -> Option<i32> {
        self.value_as_number
    }

    #[inline]
    pub fn has_value(&self) -> bool {
        self.value.is_some()
    }

    /// Whether this is a control symbol (`\~`, `\*`, ...) rather than a word.
    #[inline]
    pub fn is_control_symbol(&self) -> bool {
        !self
            .name
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic())
    }

    #[inline]
    pub fn accept(&self, visitor: &mut dyn ElementVisitor) {
        visitor.visit_tag(self);
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\\{}", self.full_name)
    }
}

/// A run of decoded literal text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Text {
    text: String,
}

impl Text {
    #[inline]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    #[inline]
    pub fn into_string(self) -> String {
        self.text
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    #[inline]
    pub fn accept(&self, visitor: &mut dyn ElementVisitor) {
        visitor.visit_text(self);
    }
}

impl fmt::Display for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// A brace-delimited group and its ordered children.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Group {
    children: Vec<Element>,
}

impl Group {
    /// Create an empty group.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a group from its children.
    #[inline]
    pub fn with_children(children: Vec<Element>) -> Self {
        Self { children }
    }

    /// Append a child.
    #[inline]
    pub fn push(&mut self, element: impl Into<Element>) {
        self.children.push(element.into());
    }

    #[inline]
    pub fn children(&self) -> &[Element] {
        &self.children
    }

    #[inline]
    pub fn into_children(self) -> Vec<Element> {
        self.children
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Direct child groups, in order.
    pub fn child_groups(&self) -> impl Iterator<Item = &Group> {
        self.children.iter().filter_map(Element::as_group)
    }

    /// Name of the first tag, looking through a leading `\*` marker.
    ///
    /// `None` when the group is empty or does not start with a tag.
    pub fn destination(&self) -> Option<&str> {
        let first = self.children.first()?.as_tag()?;
        if first.name() == keywords::EXTENSION_DESTINATION
            && let Some(second) = self.children.get(1).and_then(Element::as_tag)
        {
            return Some(second.name());
        }
        Some(first.name())
    }

    /// Whether the group starts with the `\*` extension marker.
    pub fn is_extension_destination(&self) -> bool {
        self.children
            .first()
            .and_then(Element::as_tag)
            .is_some_and(|tag| tag.name() == keywords::EXTENSION_DESTINATION)
    }

    /// First direct child group whose destination is `destination`.
    pub fn select_child_group_with_destination(&self, destination: &str) -> Option<&Group> {
        self.child_groups()
            .find(|group| group.destination() == Some(destination))
    }

    /// All text in this group and its descendants, in source order.
    pub fn text(&self) -> String {
        let mut collector = super::visitor::TextCollector::default();
        super::visitor::walk(self, super::visitor::VisitorOrder::DepthFirst, &mut collector);
        collector.into_text()
    }

    #[inline]
    pub fn accept(&self, visitor: &mut dyn ElementVisitor) {
        visitor.visit_group(self);
    }
}

impl FromIterator<Element> for Group {
    fn from_iter<I: IntoIterator<Item = Element>>(iter: I) -> Self {
        Self::with_children(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(children: Vec<Element>) -> Group {
        Group::with_children(children)
    }

    #[test]
    fn test_tag_with_value() {
        let tag = Tag::new("f", Some("0"));
        assert_eq!(tag.full_name(), "f0");
        assert_eq!(tag.name(), "f");
        assert_eq!(tag.value_as_text(), Some("0"));
        assert_eq!(tag.value_as_number(), Some(0));
        assert!(tag.has_value());
    }

    #[test]
    fn test_tag_negative_and_unparsable_values() {
        assert_eq!(Tag::new("li", Some("-360")).value_as_number(), Some(-360));
        // Out of i32 range: kept as text, no number.
        let big = Tag::new("x", Some("99999999999"));
        assert_eq!(big.value_as_text(), Some("99999999999"));
        assert_eq!(big.value_as_number(), None);
        assert_eq!(Tag::named("par").value_as_number(), None);
    }

    #[test]
    fn test_tag_from_full_name() {
        let tag = Tag::from_full_name("fs24");
        assert_eq!(tag.name(), "fs");
        assert_eq!(tag.value_as_number(), Some(24));

        let tag = Tag::from_full_name("pard");
        assert_eq!(tag.name(), "pard");
        assert!(!tag.has_value());

        let tag = Tag::from_full_name("*");
        assert_eq!(tag.name(), "*");
        assert!(tag.is_control_symbol());
        assert!(!Tag::named("rtf").is_control_symbol());
    }

    #[test]
    fn test_tag_display() {
        assert_eq!(Tag::new("ansicpg", Some("1252")).to_string(), "\\ansicpg1252");
    }

    #[test]
    fn test_structural_equality() {
        let a = group(vec![Tag::named("b").into(), Text::new("x").into()]);
        let b = group(vec![Tag::named("b").into(), Text::new("x").into()]);
        let c = group(vec![Tag::named("i").into(), Text::new("x").into()]);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(Element::Text(Text::new("b")), Element::Tag(Tag::named("b")));

        let nested_a = group(vec![a.clone().into()]);
        let nested_c = group(vec![c.into()]);
        assert_ne!(nested_a, nested_c);

        use std::collections::HashSet;
        let set: HashSet<Group> = [a.clone(), b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_destination() {
        let ext = group(vec![Tag::named("*").into(), Tag::named("foo").into()]);
        assert_eq!(ext.destination(), Some("foo"));
        assert!(ext.is_extension_destination());

        let plain = group(vec![Tag::named("bar").into(), Text::new("x").into()]);
        assert_eq!(plain.destination(), Some("bar"));
        assert!(!plain.is_extension_destination());

        assert_eq!(Group::new().destination(), None);
        assert!(!Group::new().is_extension_destination());

        let text_first = group(vec![Text::new("x").into(), Tag::named("bar").into()]);
        assert_eq!(text_first.destination(), None);

        // Marker followed by text falls back to the marker itself.
        let odd = group(vec![Tag::named("*").into(), Text::new("x").into()]);
        assert_eq!(odd.destination(), Some("*"));
    }

    #[test]
    fn test_select_child_group_with_destination() {
        let fonts = group(vec![Tag::named("fonttbl").into()]);
        let colors = group(vec![Tag::named("colortbl").into()]);
        let root = group(vec![
            Tag::new("rtf", Some("1")).into(),
            fonts.clone().into(),
            colors.clone().into(),
            Text::new("hi").into(),
        ]);
        assert_eq!(root.select_child_group_with_destination("fonttbl"), Some(&fonts));
        assert_eq!(root.select_child_group_with_destination("colortbl"), Some(&colors));
        assert_eq!(root.select_child_group_with_destination("info"), None);
        assert_eq!(root.child_groups().count(), 2);
    }

    #[test]
    fn test_group_text() {
        let root = group(vec![
            Text::new("a").into(),
            group(vec![Tag::named("b").into(), Text::new("b").into()]).into(),
            Text::new("c").into(),
        ]);
        assert_eq!(root.text(), "abc");
    }

    #[test]
    fn test_element_kind() {
        assert_eq!(Element::from(Tag::named("b")).kind(), ElementKind::Tag);
        assert_eq!(Element::from(Text::new("x")).kind(), ElementKind::Text);
        assert_eq!(Element::from(Group::new()).kind(), ElementKind::Group);
    }
}
