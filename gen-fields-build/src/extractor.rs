//! Field extraction from parsed struct declarations.

use log::debug;
use tree_sitter::Node;
use unicode_general_category::{GeneralCategory, get_general_category};

use crate::error::{GenerateError, Result};
use crate::syntax::GoFile;

/// A tagged `string` field that gets a generated accessor pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// First declared identifier of the field (e.g., "Hostname")
    pub name: String,
    /// Lookup key taken from the tag (e.g., "hostname")
    pub key: String,
}

/// Collect a descriptor for every qualifying field of every top-level struct
/// type, in declaration order.
pub fn extract_fields(file: &GoFile) -> Result<Vec<FieldDescriptor>> {
    let mut fields = Vec::new();

    for (type_name, st) in struct_types(file) {
        for field in field_declarations(st) {
            let Some((name, tag)) = selected(file, field) else {
                continue;
            };
            let key = tag_key(tag).ok_or_else(|| GenerateError::MalformedTag {
                package: file.package().to_string(),
                field: name.to_string(),
                tag: tag.to_string(),
            })?;
            debug!("{type_name}.{name}: key {key:?}");
            fields.push(FieldDescriptor {
                name: name.to_string(),
                key: key.to_string(),
            });
        }
    }

    Ok(fields)
}

/// `struct_type` nodes bound directly to a name by a top-level `type`
/// declaration, alias declarations included.
fn struct_types(file: &GoFile) -> Vec<(&str, Node<'_>)> {
    let root = file.root();
    let mut found = Vec::new();

    let mut cursor = root.walk();
    for decl in root.named_children(&mut cursor) {
        if decl.kind() != "type_declaration" {
            continue;
        }
        let mut spec_cursor = decl.walk();
        for spec in decl.named_children(&mut spec_cursor) {
            if !matches!(spec.kind(), "type_spec" | "type_alias") {
                continue;
            }
            if let (Some(name), Some(ty)) = (spec.child_by_field_name("name"), spec.child_by_field_name("type"))
                && ty.kind() == "struct_type"
            {
                found.push((file.text(name), ty));
            }
        }
    }

    found
}

fn field_declarations(st: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = st.walk();
    let Some(list) = st
        .named_children(&mut cursor)
        .find(|node| node.kind() == "field_declaration_list")
    else {
        return Vec::new();
    };

    let mut list_cursor = list.walk();
    let fields = list
        .named_children(&mut list_cursor)
        .filter(|node| node.kind() == "field_declaration")
        .collect();
    fields
}

/// Name and tag of a named, tagged field declared with the bare `string` type.
/// Only the first of several co-declared names is returned.
fn selected<'f>(file: &'f GoFile, field: Node<'_>) -> Option<(&'f str, &'f str)> {
    let name = field.child_by_field_name("name")?;
    let tag = field.child_by_field_name("tag")?;
    let ty = field.child_by_field_name("type")?;
    (ty.kind() == "type_identifier" && file.text(ty) == "string").then(|| (file.text(name), file.text(tag)))
}

/// Second token of the tag after splitting on everything that is not a letter
/// or a number: `` `json:"hostname"` `` gives `hostname`.
pub fn tag_key(tag: &str) -> Option<&str> {
    tag.split(|c: char| !is_letter_or_number(c))
        .filter(|token| !token.is_empty())
        .nth(1)
}

/// Unicode categories L and N. Combining marks do not count even when they
/// carry the Alphabetic property.
fn is_letter_or_number(c: char) -> bool {
    use GeneralCategory::*;
    matches!(
        get_general_category(c),
        UppercaseLetter
            | LowercaseLetter
            | TitlecaseLetter
            | ModifierLetter
            | OtherLetter
            | DecimalNumber
            | LetterNumber
            | OtherNumber
    )
}
