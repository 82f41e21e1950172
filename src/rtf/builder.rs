//! Listener that folds the parser event stream into a [`Group`] tree.

use super::element::{Element, Group, Tag, Text};
use super::error::{RtfError, RtfResult};
use super::listener::ParserListener;

/// Builds the element tree of a single parse.
///
/// State is reset on every `parse_begin`; the root group is available only
/// after the parse reported success.
#[derive(Debug, Default)]
pub struct StructureBuilder {
    /// Enclosing groups of `current`, outermost first
    open_groups: Vec<Group>,
    current: Option<Group>,
    root: Option<Group>,
    succeeded: bool,
}

impl StructureBuilder {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Root group of the last successful parse.
    #[inline]
    pub fn root(&self) -> Option<&Group> {
        if self.succeeded {
            self.root.as_ref()
        } else {
            None
        }
    }

    /// Take the root group of the last successful parse.
    pub fn take_root(&mut self) -> Option<Group> {
        if self.succeeded {
            self.succeeded = false;
            self.root.take()
        } else {
            None
        }
    }

    /// Consume the builder, returning the root group.
    pub fn into_root(mut self) -> RtfResult<Group> {
        self.take_root().ok_or(RtfError::NoRootGroup)
    }

    fn append(&mut self, element: Element) -> RtfResult<()> {
        let group = self
            .current
            .as_mut()
            .ok_or(RtfError::MissingGroupForNewTag)?;
        group.push(element);
        Ok(())
    }
}

impl ParserListener for StructureBuilder {
    fn parse_begin(&mut self) -> RtfResult<()> {
        self.open_groups.clear();
        self.current = None;
        self.root = None;
        self.succeeded = false;
        Ok(())
    }

    fn group_begin(&mut self) -> RtfResult<()> {
        if let Some(parent) = self.current.take() {
            self.open_groups.push(parent);
        }
        self.current = Some(Group::new());
        Ok(())
    }

    fn tag_found(&mut self, tag: &Tag) -> RtfResult<()> {
        self.append(Element::Tag(tag.clone()))
    }

    fn text_found(&mut self, text: &Text) -> RtfResult<()> {
        self.append(Element::Text(text.clone()))
    }

    fn group_end(&mut self) -> RtfResult<()> {
        let finished = self.current.take().ok_or(RtfError::TooManyBraces)?;
        match self.open_groups.pop() {
            Some(mut parent) => {
                parent.push(finished);
                self.current = Some(parent);
            },
            None => {
                if self.root.is_some() {
                    return Err(RtfError::MultipleRootGroups);
                }
                self.root = Some(finished);
            },
        }
        Ok(())
    }

    fn parse_success(&mut self) -> RtfResult<()> {
        self.succeeded = true;
        Ok(())
    }

    fn parse_fail(&mut self, _reason: &RtfError) -> RtfResult<()> {
        self.succeeded = false;
        Ok(())
    }

    fn parse_end(&mut self) -> RtfResult<()> {
        let unclosed = self.open_groups.len() + usize::from(self.current.is_some());
        if unclosed > 0 {
            self.succeeded = false;
            return Err(RtfError::UnclosedGroups(unclosed));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_simple(builder: &mut StructureBuilder) -> RtfResult<()> {
        builder.parse_begin()?;
        builder.group_begin()?;
        builder.tag_found(&Tag::new("rtf", Some("1")))?;
        builder.group_begin()?;
        builder.tag_found(&Tag::named("b"))?;
        builder.text_found(&Text::new("bold"))?;
        builder.group_end()?;
        builder.text_found(&Text::new("plain"))?;
        builder.group_end()?;
        builder.parse_success()?;
        builder.parse_end()
    }

    #[test]
    fn test_builds_nested_tree() {
        let mut builder = StructureBuilder::new();
        feed_simple(&mut builder).unwrap();

        let root = builder.into_root().unwrap();
        assert_eq!(root.len(), 3);
        assert_eq!(root.destination(), Some("rtf"));
        let inner = root.children()[1].as_group().unwrap();
        assert_eq!(inner.destination(), Some("b"));
        assert_eq!(inner.children()[1].as_text().unwrap().as_str(), "bold");
        assert_eq!(root.children()[2].as_text().unwrap().as_str(), "plain");
    }

    #[test]
    fn test_element_outside_group() {
        let mut builder = StructureBuilder::new();
        builder.parse_begin().unwrap();
        let err = builder.tag_found(&Tag::named("b")).unwrap_err();
        assert!(matches!(err, RtfError::MissingGroupForNewTag));
        let err = builder.text_found(&Text::new("x")).unwrap_err();
        assert!(matches!(err, RtfError::MissingGroupForNewTag));
    }

    #[test]
    fn test_multiple_root_groups() {
        let mut builder = StructureBuilder::new();
        builder.parse_begin().unwrap();
        builder.group_begin().unwrap();
        builder.group_end().unwrap();
        builder.group_begin().unwrap();
        let err = builder.group_end().unwrap_err();
        assert!(matches!(err, RtfError::MultipleRootGroups));
    }

    #[test]
    fn test_unclosed_groups_at_parse_end() {
        let mut builder = StructureBuilder::new();
        builder.parse_begin().unwrap();
        builder.group_begin().unwrap();
        builder.group_begin().unwrap();
        let err = builder.parse_end().unwrap_err();
        assert!(matches!(err, RtfError::UnclosedGroups(2)));
        assert!(builder.root().is_none());
    }

    #[test]
    fn test_root_hidden_until_success() {
        let mut builder = StructureBuilder::new();
        builder.parse_begin().unwrap();
        builder.group_begin().unwrap();
        builder.group_end().unwrap();
        assert!(builder.root().is_none());
        builder.parse_fail(&RtfError::EmptyDocument).unwrap();
        builder.parse_end().unwrap();
        assert!(builder.root().is_none());
        assert!(matches!(builder.into_root(), Err(RtfError::NoRootGroup)));
    }

    #[test]
    fn test_reset_on_parse_begin() {
        let mut builder = StructureBuilder::new();
        feed_simple(&mut builder).unwrap();
        assert!(builder.root().is_some());
        // A second parse starts from scratch, so a new root is not a second root.
        feed_simple(&mut builder).unwrap();
        assert!(builder.take_root().is_some());
        assert!(builder.root().is_none());
    }
}
