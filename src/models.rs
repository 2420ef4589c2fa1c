//! Response entities for code lists, editions and codes.
//!
//! All entities are value objects built fresh from query rows for each
//! request. Hyperlinks are derived from identifiers and the public base URL;
//! nothing about them is stored in the graph.

use serde::{Deserialize, Serialize};

/// A denormalised reference to another resource
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub href: String,
}

impl Link {
    pub fn new(href: impl Into<String>) -> Self {
        Link {
            id: String::new(),
            href: href.into(),
        }
    }

    pub fn with_id(id: impl Into<String>, href: impl Into<String>) -> Self {
        Link {
            id: id.into(),
            href: href.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeListLinks {
    #[serde(rename = "self")]
    pub self_link: Link,
    pub editions: Link,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeList {
    pub id: String,
    pub links: CodeListLinks,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditionLinks {
    #[serde(rename = "self")]
    pub self_link: Link,
    pub editions: Link,
    pub codes: Link,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edition {
    #[serde(rename = "edition")]
    pub id: String,
    pub label: String,
    pub links: EditionLinks,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeLinks {
    #[serde(rename = "self")]
    pub self_link: Link,
    pub datasets: Link,
    pub code_list: Link,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Code {
    /// Graph-assigned node identity
    pub id: String,
    pub code: String,
    pub label: String,
    pub links: CodeLinks,
}

/// A window onto an ordered, fully materialised result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub count: usize,
    pub offset: usize,
    pub limit: usize,
    pub total_count: usize,
}

pub type CodeLists = Page<CodeList>;
pub type Editions = Page<Edition>;
pub type Codes = Page<Code>;

impl<T> Default for Page<T> {
    fn default() -> Self {
        Page {
            items: Vec::new(),
            count: 0,
            offset: 0,
            limit: 0,
            total_count: 0,
        }
    }
}

impl<T> Page<T> {
    /// Wraps a complete result: count, limit and total count all equal its length
    pub fn complete(items: Vec<T>) -> Self {
        let len = items.len();
        Page {
            items,
            count: len,
            offset: 0,
            limit: len,
            total_count: len,
        }
    }

    /// Slices the items to `[offset, offset + limit)`.
    ///
    /// `total_count` stays the pre-slice size; an offset past the end yields
    /// an empty page.
    pub fn paginate(self, offset: usize, limit: usize) -> Self {
        let total_count = self.items.len();
        let items: Vec<T> = self.items.into_iter().skip(offset).take(limit).collect();
        Page {
            count: items.len(),
            items,
            offset,
            limit,
            total_count,
        }
    }
}

/// Builds resource hyperlinks from the public API base URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkBuilder {
    base_url: String,
}

impl LinkBuilder {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        LinkBuilder {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn code_list_href(&self, code_list_id: &str) -> String {
        format!("{}/code-lists/{}", self.base_url, code_list_id)
    }

    fn edition_href(&self, code_list_id: &str, edition_id: &str) -> String {
        format!("{}/editions/{}", self.code_list_href(code_list_id), edition_id)
    }

    fn code_href(&self, code_list_id: &str, edition_id: &str, code: &str) -> String {
        format!("{}/codes/{}", self.edition_href(code_list_id, edition_id), code)
    }

    pub fn code_list(&self, id: &str) -> CodeList {
        CodeList {
            id: id.to_string(),
            links: CodeListLinks {
                self_link: Link::with_id(id, self.code_list_href(id)),
                editions: Link::new(format!("{}/editions", self.code_list_href(id))),
            },
        }
    }

    pub fn edition(&self, code_list_id: &str, id: &str, label: &str) -> Edition {
        let self_href = self.edition_href(code_list_id, id);
        Edition {
            id: id.to_string(),
            label: label.to_string(),
            links: EditionLinks {
                codes: Link::new(format!("{}/codes", self_href)),
                self_link: Link::with_id(id, self_href),
                editions: Link::new(format!("{}/editions", self.code_list_href(code_list_id))),
            },
        }
    }

    pub fn code(
        &self,
        code_list_id: &str,
        edition_id: &str,
        id: &str,
        code: &str,
        label: &str,
    ) -> Code {
        let self_href = self.code_href(code_list_id, edition_id, code);
        Code {
            id: id.to_string(),
            code: code.to_string(),
            label: label.to_string(),
            links: CodeLinks {
                datasets: Link::new(format!("{}/datasets", self_href)),
                self_link: Link::with_id(code, self_href),
                code_list: Link::new(self.code_list_href(code_list_id)),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn two_item_page() -> Page<&'static str> {
        Page::complete(vec!["first", "second"])
    }

    #[test_case(0, 1, &["first"] ; "first page")]
    #[test_case(1, 7, &["second"] ; "limit beyond remaining items")]
    #[test_case(3, 1, &[] ; "offset beyond total count")]
    #[test_case(2, 1, &[] ; "offset equal to total count")]
    #[test_case(0, 0, &[] ; "zero limit")]
    fn test_paginate(offset: usize, limit: usize, expected: &[&str]) {
        let page = two_item_page().paginate(offset, limit);
        assert_eq!(page.items, expected.to_vec());
        assert_eq!(page.count, expected.len());
        assert_eq!(page.offset, offset);
        assert_eq!(page.limit, limit);
        assert_eq!(page.total_count, 2);
    }

    #[test]
    fn test_complete_page_counts() {
        let page = two_item_page();
        assert_eq!(page.count, 2);
        assert_eq!(page.limit, 2);
        assert_eq!(page.total_count, 2);
        assert_eq!(page.offset, 0);
    }

    #[test]
    fn test_code_links() {
        let links = LinkBuilder::new("http://localhost:22400/");
        let code = links.code("cpih1dim1aggid", "one-off", "666", "c1", "label1");

        assert_eq!(code.links.self_link.id, "c1");
        assert_eq!(
            code.links.self_link.href,
            "http://localhost:22400/code-lists/cpih1dim1aggid/editions/one-off/codes/c1"
        );
        assert_eq!(
            code.links.datasets.href,
            "http://localhost:22400/code-lists/cpih1dim1aggid/editions/one-off/codes/c1/datasets"
        );
        assert_eq!(
            code.links.code_list.href,
            "http://localhost:22400/code-lists/cpih1dim1aggid"
        );
    }

    #[test]
    fn test_edition_serialization() {
        let edition = LinkBuilder::new("").edition("abc", "2016", "Twenty sixteen");
        let json = serde_json::to_value(&edition).unwrap();

        assert_eq!(json["edition"], "2016");
        assert_eq!(json["links"]["self"]["id"], "2016");
        assert_eq!(json["links"]["self"]["href"], "/code-lists/abc/editions/2016");
        assert_eq!(json["links"]["codes"]["href"], "/code-lists/abc/editions/2016/codes");
        // Links without an id omit the field entirely
        assert!(json["links"]["editions"].get("id").is_none());
    }
}
