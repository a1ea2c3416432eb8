//! Markup helpers.

use beadmap_core::Popup;

/// Escape text for use in HTML element content and quoted attributes.
///
/// # Examples
/// ```
/// use beadmap_render::escape_html;
///
/// assert_eq!(escape_html("AT&T <Fiber>"), "AT&amp;T &lt;Fiber&gt;");
/// ```
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Render a popup table.
///
/// Popups with column headers become a header row plus one row per record.
/// Popups without headers are key/value tables.
#[must_use]
pub fn popup_html(popup: &Popup) -> String {
    let mut html = String::from("<div class=\"beadmap-popup\">");
    html.push_str(&format!("<h4>{}</h4><table>", escape_html(&popup.title)));
    if popup.columns.is_empty() {
        for row in &popup.rows {
            let mut cells = row.iter();
            let key = cells.next().map(String::as_str).unwrap_or_default();
            let value = cells.map(String::as_str).collect::<Vec<_>>().join(" ");
            html.push_str(&format!(
                "<tr><th>{}</th><td>{}</td></tr>",
                escape_html(key),
                escape_html(&value)
            ));
        }
    } else {
        html.push_str("<tr>");
        for column in &popup.columns {
            html.push_str(&format!("<th>{}</th>", escape_html(column)));
        }
        html.push_str("</tr>");
        for row in &popup.rows {
            html.push_str("<tr>");
            for cell in row {
                html.push_str(&format!("<td>{}</td>", escape_html(cell)));
            }
            html.push_str("</tr>");
        }
    }
    html.push_str("</table></div>");
    html
}
