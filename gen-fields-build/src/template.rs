//! Go source template for the generated accessors.

use std::fmt::Write;

use crate::extractor::FieldDescriptor;

/// First line of every generated file.
pub const GENERATED_HEADER: &str = "// Code generated by gen-fields; DO NOT EDIT.";

/// Prefix of the exported accessor names.
pub const GETTER_PREFIX: &str = "Get";

/// Prefix of the private request helpers.
pub const REQUEST_PREFIX: &str = "request";

/// Response body that means "no value" and is returned as an empty string.
pub const SENTINEL: &str = "undefined";

const IMPORTS: &[&str] = &["bytes", "net", "strings"];

/// Render the generated file for a package: header, package clause, imports
/// and one accessor fragment per field.
pub fn render(package: &str, fields: &[FieldDescriptor]) -> String {
    let mut content = String::new();

    let _ = writeln!(content, "{GENERATED_HEADER}");
    let _ = writeln!(content);
    let _ = writeln!(content, "package {package}");
    let _ = writeln!(content);
    let _ = writeln!(content, "import (");
    for import in IMPORTS {
        let _ = writeln!(content, "\t\"{import}\"");
    }
    let _ = writeln!(content, ")");

    for field in fields {
        let _ = writeln!(content);
        render_fragment(&mut content, field);
    }

    content
}

fn render_fragment(content: &mut String, field: &FieldDescriptor) {
    let getter = format!("{GETTER_PREFIX}{}", field.name);
    let request = format!("{REQUEST_PREFIX}{}", field.name);
    let key = &field.key;

    // Package-level function on the shared client.
    write_doc(content, &getter, key);
    let _ = writeln!(content, "func {getter}(ip net.IP) (string, error) {{");
    let _ = writeln!(content, "\treturn c.{getter}(ip)");
    let _ = writeln!(content, "}}");
    let _ = writeln!(content);

    write_doc(content, &getter, key);
    let _ = writeln!(content, "func (c *Client) {getter}(ip net.IP) (string, error) {{");
    let _ = writeln!(content, "\ts := \"{key}\"");
    let _ = writeln!(content, "\tif ip != nil {{");
    let _ = writeln!(content, "\t\ts = ip.String() + \"/\" + s");
    let _ = writeln!(content, "\t}}");
    let _ = writeln!(content, "\tif c.Cache == nil {{");
    let _ = writeln!(content, "\t\treturn c.{request}(s)");
    let _ = writeln!(content, "\t}}");
    let _ = writeln!(content, "\tv, err := c.Cache.GetOrRequest(s, func() (interface{{}}, error) {{");
    let _ = writeln!(content, "\t\treturn c.{request}(s)");
    let _ = writeln!(content, "\t}})");
    let _ = writeln!(content, "\tif err != nil {{");
    let _ = writeln!(content, "\t\treturn \"\", err");
    let _ = writeln!(content, "\t}}");
    let _ = writeln!(content, "\treturn v.(string), err");
    let _ = writeln!(content, "}}");
    let _ = writeln!(content);

    let _ = writeln!(content, "func (c *Client) {request}(s string) (string, error) {{");
    let _ = writeln!(content, "\treq, err := c.NewRequest(s)");
    let _ = writeln!(content, "\tif err != nil {{");
    let _ = writeln!(content, "\t\treturn \"\", err");
    let _ = writeln!(content, "\t}}");
    let _ = writeln!(content, "\tv := new(bytes.Buffer)");
    let _ = writeln!(content, "\t_, err = c.Do(req, v)");
    let _ = writeln!(content, "\tif err != nil {{");
    let _ = writeln!(content, "\t\treturn \"\", err");
    let _ = writeln!(content, "\t}}");
    let _ = writeln!(content, "\tvs := strings.TrimSpace(v.String())");
    let _ = writeln!(content, "\tif vs == \"{SENTINEL}\" {{");
    let _ = writeln!(content, "\t\tvs = \"\"");
    let _ = writeln!(content, "\t}}");
    let _ = writeln!(content, "\treturn vs, nil");
    let _ = writeln!(content, "}}");
}

fn write_doc(content: &mut String, getter: &str, key: &str) {
    let _ = writeln!(content, "// {getter} returns a specific field \"{key}\" value from the");
    let _ = writeln!(content, "// API for the provided ip. If nil was provided instead of ip, it returns");
    let _ = writeln!(content, "// details for the caller's own IP.");
}
