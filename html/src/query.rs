use crate::dom::{Attribute, ContentItem, Element};

/// Collect every element named `name` in `content`, at any depth, in document order. An
/// element is searched even when it matches, so matches nested in matches are included.
pub fn get_elements_by_name<'a>(content: &'a [ContentItem], name: &str) -> Vec<&'a Element> {
    let mut found = Vec::new();
    collect_from_content(content, name, &mut found);
    found
}

fn collect_from_content<'a>(content: &'a [ContentItem], name: &str, found: &mut Vec<&'a Element>) {
    for item in content {
        if let ContentItem::Element(element) = item {
            collect_from_element(element, name, found);
        }
    }
}

fn collect_from_element<'a>(element: &'a Element, name: &str, found: &mut Vec<&'a Element>) {
    if element.name() == Some(name) {
        found.push(element);
    }
    if let Some(content) = element.content() {
        collect_from_content(content, name, found);
    }
}

impl Element {
    /// Same search as [`get_elements_by_name`], rooted at this element and including it
    pub fn get_elements_by_name(&self, name: &str) -> Vec<&Element> {
        let mut found = Vec::new();
        collect_from_element(self, name, &mut found);
        found
    }

    /// First attribute of this element (not its descendants) with the exact keyword
    pub fn get_attribute(&self, keyword: &str) -> Option<&Attribute> {
        self.attributes().iter().find(|a| a.keyword == keyword)
    }
}
