//! Front-matter parsing
//!
//! A content file starts with a YAML block fenced by `---` lines, followed by
//! the markdown body. The block is deserialized into a schema per content
//! kind ([`PostMeta`], [`ProjectMeta`]); keys outside the schema are ignored,
//! and `slug`/`category` are never read from it since they come from the
//! directory layout.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

/// Custom deserializer that handles both a single string and a list of strings
fn string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, SeqAccess, Visitor};
    use std::fmt;

    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_string()])
        }

        fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value])
        }

        fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_string()])
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_string()])
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_string()])
        }

        fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_string()])
        }

        fn visit_seq<S>(self, mut seq: S) -> Result<Self::Value, S::Error>
        where
            S: SeqAccess<'de>,
        {
            let mut vec = Vec::new();
            while let Some(item) = seq.next_element::<String>()? {
                vec.push(item);
            }
            Ok(vec)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }
    }

    deserializer.deserialize_any(StringOrVec)
}

/// A content file split into its front-matter block and markdown body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrontMatter<'a> {
    /// Raw YAML between the `---` fences, if the file has a front-matter block
    pub yaml: Option<&'a str>,
    /// Everything after the closing fence
    pub body: &'a str,
}

impl<'a> FrontMatter<'a> {
    /// Split a content string into front-matter and body
    ///
    /// Files without an opening `---` line, or with an opening line but no
    /// closing one, have no front-matter: the whole input is the body.
    pub fn split(content: &'a str) -> Self {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let no_front_matter = Self {
            yaml: None,
            body: content,
        };

        let Some(first_line_end) = content.find('\n') else {
            return no_front_matter;
        };
        if content[..first_line_end].trim_end() != "---" {
            return no_front_matter;
        }

        let rest = &content[first_line_end + 1..];
        let mut offset = 0;
        for line in rest.split_inclusive('\n') {
            if line.trim_end() == "---" {
                return Self {
                    yaml: Some(&rest[..offset]),
                    body: &rest[offset + line.len()..],
                };
            }
            offset += line.len();
        }

        no_front_matter
    }

    /// Deserialize the front-matter block into a typed schema
    ///
    /// A missing or blank block yields the schema's defaults.
    pub fn parse<T>(&self) -> Result<T, serde_yaml::Error>
    where
        T: DeserializeOwned + Default,
    {
        match self.yaml {
            Some(yaml) if !yaml.trim().is_empty() => serde_yaml::from_str(yaml),
            _ => Ok(T::default()),
        }
    }
}

/// Post author
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Author {
    pub name: String,
    pub picture: String,
}

/// Open Graph image
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OgImage {
    pub url: String,
}

/// Front-matter schema for posts
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PostMeta {
    pub title: Option<String>,
    pub date: Option<String>,
    pub cover_image: Option<String>,
    pub excerpt: Option<String>,
    pub author: Option<Author>,
    pub og_image: Option<OgImage>,
}

/// Front-matter schema for projects
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectMeta {
    pub title: Option<String>,
    pub date: Option<String>,
    pub cover_image: Option<String>,
    pub description: Option<String>,
    #[serde(deserialize_with = "string_or_vec", default)]
    pub tech: Vec<String>,
    pub github: Option<String>,
    pub demo: Option<String>,
}
