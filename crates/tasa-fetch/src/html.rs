//! Low-level HTML string helpers.
//!
//! Publisher pages are small and their markup is simple enough that tag
//! matching on lowercase text does the job. Lowering covers ASCII and the
//! accented Latin-1 capitals, whose lowercase forms have the same UTF-8
//! length, so byte offsets in the lowered copy line up with the original.

/// Finds the section between an opening tag (with attributes) and its
/// closing tag, case-insensitive. Returns the HTML *inside* the tags.
#[must_use]
pub fn slice_between_ci<'a>(s: &'a str, open_pat: &str, close_pat: &str) -> Option<&'a str> {
    let lc = to_lowercase_fast(s);
    let open_idx = lc.find(&to_lowercase_fast(open_pat))?;
    let after_open = s[open_idx..].find('>')? + open_idx + 1;
    let close_rel = lc[after_open..].find(&to_lowercase_fast(close_pat))?;
    Some(&s[after_open..after_open + close_rel])
}

/// Finds the next complete `<tag ...>...</tag>` block at or after `from`.
///
/// Returns the byte range from the start of the opening tag to the end of
/// the closing tag. Nested blocks of the same tag are not balanced.
#[must_use]
pub fn next_tag_block_ci(s: &str, tag: &str, from: usize) -> Option<(usize, usize)> {
    let lc = to_lowercase_fast(s);
    next_block_in(&lc, s, tag, from)
}

fn next_block_in(lc: &str, s: &str, tag: &str, from: usize) -> Option<(usize, usize)> {
    let open = format!("<{}", tag.to_ascii_lowercase());
    let close = format!("</{}>", tag.to_ascii_lowercase());

    let mut search = from;
    loop {
        let start = lc.get(search..)?.find(&open)? + search;
        // `<td` must not match `<tdata`.
        let after = lc.as_bytes().get(start + open.len()).copied();
        if !matches!(after, Some(b'>' | b' ' | b'\t' | b'\n' | b'\r' | b'/')) {
            search = start + open.len();
            continue;
        }
        let open_end = s[start..].find('>')? + start + 1;
        let end = lc[open_end..].find(&close)? + open_end + close.len();
        return Some((start, end));
    }
}

/// Returns every `<tag>` block in `s`, in document order.
#[must_use]
pub fn tag_blocks<'a>(s: &'a str, tag: &str) -> Vec<&'a str> {
    let lc = to_lowercase_fast(s);
    let mut blocks = Vec::new();
    let mut from = 0;
    while let Some((start, end)) = next_block_in(&lc, s, tag, from) {
        blocks.push(&s[start..end]);
        from = end;
    }
    blocks
}

/// Given a complete tag block like `<td ...>INNER</td>`, returns INNER
/// (which may still contain nested tags).
#[must_use]
pub fn inner_after_open_tag(block: &str) -> &str {
    match (block.find('>'), block.rfind('<')) {
        (Some(open_end), Some(close_start)) if close_start > open_end => {
            &block[open_end + 1..close_start]
        }
        _ => "",
    }
}

/// Returns the text content of an HTML fragment: tags removed, entities
/// decoded, whitespace collapsed.
#[must_use]
pub fn text_of(fragment: &str) -> String {
    normalize_ws(&decode_entities(&strip_tags(fragment)))
}

/// Returns the text of each `<td>` cell in a table row.
#[must_use]
pub fn cells(row: &str) -> Vec<String> {
    tag_blocks(row, "td")
        .into_iter()
        .map(|cell| text_of(inner_after_open_tag(cell)))
        .collect()
}

/// Removes all tags, leaving a space where each tag was. Script and style
/// bodies are dropped.
#[must_use]
pub fn strip_tags(s: &str) -> String {
    let lc = to_lowercase_fast(s);
    let mut out = String::with_capacity(s.len());
    let mut i = 0;
    while i < s.len() {
        let rest = &s[i..];
        if rest.starts_with('<') {
            let lc_rest = &lc[i..];
            let skip_until = if lc_rest.starts_with("<script") {
                Some("</script>")
            } else if lc_rest.starts_with("<style") {
                Some("</style>")
            } else {
                None
            };
            if let Some(close) = skip_until {
                i = lc_rest.find(close).map_or(s.len(), |rel| i + rel + close.len());
                out.push(' ');
                continue;
            }
            match rest.find('>') {
                Some(rel) => {
                    i += rel + 1;
                    out.push(' ');
                }
                None => break,
            }
        } else {
            let next = rest.find('<').unwrap_or(rest.len());
            out.push_str(&rest[..next]);
            i += next;
        }
    }
    out
}

/// Decodes the entities publisher pages actually use: `&nbsp;`, `&amp;`,
/// quotes, Spanish accented letters and numeric references.
#[must_use]
pub fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        let decoded = rest
            .find(';')
            .filter(|&semi| semi <= 10)
            .and_then(|semi| entity(&rest[1..semi]).map(|ch| (ch, semi)));
        match decoded {
            Some((ch, semi)) => {
                out.push(ch);
                rest = &rest[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn entity(name: &str) -> Option<char> {
    if let Some(num) = name.strip_prefix('#') {
        let code = match num.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse().ok()?,
        };
        return char::from_u32(code);
    }
    Some(match name {
        "nbsp" => ' ',
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "aacute" => 'á',
        "eacute" => 'é',
        "iacute" => 'í',
        "oacute" => 'ó',
        "uacute" => 'ú',
        "Aacute" => 'Á',
        "Eacute" => 'É',
        "Iacute" => 'Í',
        "Oacute" => 'Ó',
        "Uacute" => 'Ú',
        "ntilde" => 'ñ',
        "Ntilde" => 'Ñ',
        "uuml" => 'ü',
        "ordm" => 'º',
        "deg" => '°',
        _ => return None,
    })
}

/// Collapses whitespace runs (including non-breaking spaces) into a single
/// space and trims.
#[must_use]
pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space {
                out.push(' ');
                prev_space = true;
            }
        } else {
            out.push(ch);
            prev_space = false;
        }
    }
    out.trim().to_string()
}

/// Lowercases ASCII and Latin-1 capitals (`Á`, `É`, `Ñ`, ...); preserves
/// byte offsets.
#[must_use]
pub fn to_lowercase_fast(s: &str) -> String {
    s.chars().map(lower_same_width).collect()
}

fn lower_same_width(c: char) -> char {
    match c {
        'A'..='Z' => c.to_ascii_lowercase(),
        // U+00C0..=U+00DE minus the multiplication sign; lowercase is +0x20.
        'À'..='Þ' if c != '×' => char::from_u32(u32::from(c) + 0x20).unwrap_or(c),
        _ => c,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = r#"
        <TABLE class="table">
          <thead><tr><th>Variable</th><th>Fecha</th><th>Valor</th></tr></thead>
          <tbody>
            <tr><td class="x">CER | Base 02/02/2002</td><td>19/07/2025</td><td>607,6799</td></tr>
            <tr><td>Tasa&nbsp;de pol&iacute;tica</td><td>18/07/2025</td><td>29,00</td></tr>
          </tbody>
        </TABLE>"#;

    #[test]
    fn test_slice_between_ci() {
        let body = slice_between_ci(TABLE, "<tbody", "</tbody>").unwrap();
        assert!(body.contains("CER"));
        assert!(!body.contains("thead"));
    }

    #[test]
    fn test_tag_blocks_and_cells() {
        let body = slice_between_ci(TABLE, "<tbody", "</tbody>").unwrap();
        let rows = tag_blocks(body, "tr");
        assert_eq!(rows.len(), 2);
        assert_eq!(cells(rows[0]), ["CER | Base 02/02/2002", "19/07/2025", "607,6799"]);
        assert_eq!(cells(rows[1])[0], "Tasa de política");
    }

    #[test]
    fn test_tag_prefix_not_matched() {
        let html = "<tdata>x</tdata><td>y</td>";
        let blocks = tag_blocks(html, "td");
        assert_eq!(blocks, ["<td>y</td>"]);
    }

    #[test]
    fn test_text_of_skips_script() {
        let html = "<div>Vigente <script>var x = '<b>';</script>desde <b>01/07/2025</b></div>";
        assert_eq!(text_of(html), "Vigente desde 01/07/2025");
    }

    #[test]
    fn test_decode_entities() {
        assert_eq!(decode_entities("Variaci&oacute;n &amp; m&#225;s"), "Variación & más");
        assert_eq!(decode_entities("a & b"), "a & b");
        assert_eq!(decode_entities("&#x41;&bogus;"), "A&bogus;");
    }

    #[test]
    fn test_to_lowercase_preserves_offsets() {
        let s = "Índice TNA";
        assert_eq!(to_lowercase_fast(s).len(), s.len());
    }

    #[test]
    fn test_to_lowercase_folds_accented_capitals() {
        assert_eq!(to_lowercase_fast("VARIACIÓN MENSUAL"), "variación mensual");
        assert_eq!(to_lowercase_fast("AÑO ÚLTIMO"), "año último");
        assert_eq!(to_lowercase_fast("3×2 ß"), "3×2 ß");

        let s = "<P>ÍNDICE</P>";
        assert_eq!(slice_between_ci(s, "<p", "</p>"), Some("ÍNDICE"));
    }
}
