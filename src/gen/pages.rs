// HTML pages of the generated site.

use std::path::Path;

use crate::gen::config_reader::{ModelSettings, Translations, CATEGORY_GROUP};
use crate::gen::export::PageLinks;
use crate::gen::*;

pub const NAVIGATE_JS: &str = include_str!("../../data/navigate.js");
pub const STYLES_CSS: &str = include_str!("../../data/styles.css");

const GENERATED_NOTICE: &str = "<!-- File generated by rankgen. -->";

/// Escapes text for HTML content and attribute values.
pub fn esc<S: AsRef<str>>(s: S) -> String {
    let mut out = String::with_capacity(s.as_ref().len() + 8);
    for ch in s.as_ref().chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn is_link(s: &str) -> bool {
    (s.starts_with("http://") || s.starts_with("https://") || s.starts_with("ftp://"))
        && !s.chars().any(char::is_whitespace)
}

fn value_html(v: &Value) -> String {
    let s = v.to_string();
    if is_link(&s) {
        format!("<a href=\"{}\">{}</a>", esc(&s), esc(&s))
    } else {
        esc(s)
    }
}

fn title_tag(prefix: Option<&str>, settings: &ModelSettings) -> String {
    let page_title = settings.page_title();
    match prefix {
        _ if page_title.is_empty() => "".to_string(),
        Some(p) => format!("<title>{} - {}</title>", esc(p), esc(page_title)),
        None => format!("<title>{}</title>", esc(page_title)),
    }
}

fn write_page(path: &Path, content: &str) -> GenResult<()> {
    info!("writing page to {:?}", path);
    fs::write(path, content).context(WritingFileSnafu {
        path: path.display().to_string(),
    })
}

pub fn create_dir(path: &Path) -> GenResult<()> {
    fs::create_dir_all(path).context(WritingFileSnafu {
        path: path.display().to_string(),
    })
}

/// A two-column table of the fields of an answer. Empty values are shown as such.
pub fn characteristics_table(fields: &[(String, Vec<Value>)], tr: &Translations) -> String {
    let mut content = String::new();
    content.push_str("<table class=\"detailstable\">\n");
    content.push_str(&format!(
        "<tr> <th>{}:</th> <th>{}:</th> </tr>\n",
        esc(tr.get("Parameter")),
        esc(tr.get("Value"))
    ));
    for (key, values) in fields.iter() {
        let mut val_str = values
            .iter()
            .filter(|v| !v.is_empty())
            .map(value_html)
            .collect::<Vec<String>>()
            .join(", ");
        if val_str.is_empty() {
            val_str = format!("<span class=\"empty\">[{}]</span>", esc(tr.get("empty")));
        }
        content.push_str(&format!(
            "<tr> <td>{}</td> <td>{}</td> </tr>\n",
            esc(tr.get_in(CATEGORY_GROUP, key)),
            val_str
        ));
    }
    content.push_str("</table>");
    content
}

// The row of an answer and its details, values sorted.
fn answer_fields(model: &Model, answer: &Value) -> Vec<(String, Vec<Value>)> {
    let table = model.table();
    let mut fields: Vec<(String, Vec<Value>)> = Vec::new();
    // With duplicated answers, the last row is the one kept in the weights.
    if let Some(row) = table
        .rows()
        .iter()
        .rev()
        .find(|r| table.answer_of(r) == *answer)
    {
        for (name, cell) in table.columns().iter().zip(row.cells.iter()) {
            fields.push((name.clone(), cell.values().to_vec()));
        }
    }
    if let Some(details) = model.details_of(answer) {
        for (name, cell) in details.fields.iter() {
            let values = cell.values().to_vec();
            match fields.iter_mut().find(|(n, _)| n == name) {
                Some(field) => field.1 = values,
                None => fields.push((name.clone(), values)),
            }
        }
    }
    for (_, values) in fields.iter_mut() {
        values.sort();
    }
    fields
}

/// Writes one page per answer. Returns the page of each answer, relative to
/// the output directory.
pub fn write_details_pages(
    model: &Model,
    settings: &ModelSettings,
    tr: &Translations,
    out_dir: &Path,
) -> GenResult<Vec<(Value, String)>> {
    let pages_dir = settings.subpage_dir();
    create_dir(&out_dir.join(pages_dir))?;

    let answers = model.weights().answers();
    let mut res: Vec<(Value, String)> = Vec::new();
    for (idx, aw) in answers.iter().enumerate() {
        let fields = answer_fields(model, &aw.answer);
        let characteristics_content = characteristics_table(&fields, tr);

        let mut prev_link = esc(tr.get("Prev"));
        if idx > 0 {
            prev_link = format!("<a href=\"match_{}.html\">{}</a>", idx - 1, prev_link);
        }
        let mut next_link = esc(tr.get("Next"));
        if idx + 1 < answers.len() {
            next_link = format!("<a href=\"match_{}.html\">{}</a>", idx + 1, next_link);
        }

        let content = format!(
            "<html>
{notice}
<head>
<meta charset=\"utf-8\">
{title}
<link rel=\"stylesheet\" type=\"text/css\" href=\"../styles.css\">
</head>
<body>
<div>
<a href=\"../index.html\">{back}</a>
</div>
<div class=\"bottomspace\">
<span>{prev}</span> <span>{next}</span>
</div>
<div class=\"characteristics bottomspace\">
{characteristics}
</div>
</body>
</html>
",
            notice = GENERATED_NOTICE,
            title = title_tag(Some(aw.answer.to_string().as_str()), settings),
            back = esc(tr.get("Back to Filters")),
            prev = prev_link,
            next = next_link,
            characteristics = characteristics_content,
        );
        let page_name = format!("match_{}.html", idx);
        write_page(&out_dir.join(pages_dir).join(&page_name), &content)?;
        res.push((aw.answer.clone(), format!("{}/{}", pages_dir, page_name)));
    }
    Ok(res)
}

/// The table of a characteristic: every possible value with the answers holding it.
pub fn categories_table(model: &Model, column: &str, links: &PageLinks, tr: &Translations) -> String {
    let mut content = String::new();
    content.push_str("<table cellspacing=\"0\" class=\"categoriestable\">\n");
    content.push_str(&format!(
        "<tr> <th>{}:</th> </tr>\n",
        esc(tr.get_in(CATEGORY_GROUP, column))
    ));
    let values = model.possible_values().get(column).unwrap_or(&[]);
    for (val_idx, value) in values.iter().enumerate() {
        let found: Vec<&Value> = model
            .weights()
            .answers()
            .iter()
            .filter(|aw| aw.get(column).and_then(|w| w.get(value)) == Some(1.0))
            .map(|aw| &aw.answer)
            .collect();
        let value_label = if value.is_empty() {
            format!("[{}]", esc(tr.get("empty")))
        } else {
            value_html(value)
        };
        if found.is_empty() {
            content.push_str(&format!(
                "<tr class=\"{}\"> <td rowspan='1'>{}</td> <td></td> </tr>\n",
                row_class(val_idx),
                value_label
            ));
            continue;
        }
        for (answer_idx, answer) in found.iter().enumerate() {
            let answer_item = match links.details_page(answer) {
                Some(page) => format!("<a href=\"../{}\">{}</a>", esc(page), esc(answer.to_string())),
                None => esc(answer.to_string()),
            };
            let first_column = if answer_idx == 0 {
                format!("<td rowspan='{}'>{}</td>", found.len(), value_label)
            } else {
                "".to_string()
            };
            content.push_str(&format!(
                "<tr class=\"{}\"> {} <td>{}</td> </tr>\n",
                row_class(val_idx + answer_idx),
                first_column,
                answer_item
            ));
        }
    }
    content.push_str("</table>\n");
    content
}

fn row_class(idx: usize) -> &'static str {
    if idx % 2 == 0 {
        "roweven"
    } else {
        "rowodd"
    }
}

/// Writes one page per characteristic. The answers link to their details pages.
pub fn write_category_pages(
    model: &Model,
    settings: &ModelSettings,
    tr: &Translations,
    links: &PageLinks,
    out_dir: &Path,
) -> GenResult<Vec<(String, String)>> {
    let pages_dir = settings.subpage_dir();
    create_dir(&out_dir.join(pages_dir))?;

    let mut res: Vec<(String, String)> = Vec::new();
    for (idx, (_, column)) in model.table().characteristics().enumerate() {
        let content = format!(
            "<html>
{notice}
<head>
<meta charset=\"utf-8\">
{title}
<link rel=\"stylesheet\" type=\"text/css\" href=\"../styles.css\">
</head>
<body>
<div class=\"bottomspace\">
<a href=\"../index.html\">{back}</a>
</div>
<div class=\"categories bottomspace\">
{categories}
</div>
</body>
</html>
",
            notice = GENERATED_NOTICE,
            title = title_tag(Some(column.as_str()), settings),
            back = esc(tr.get("Back to Filters")),
            categories = categories_table(model, column, links, tr),
        );
        let page_name = format!("category_{}.html", idx);
        write_page(&out_dir.join(pages_dir).join(&page_name), &content)?;
        res.push((column.clone(), format!("{}/{}", pages_dir, page_name)));
    }
    Ok(res)
}

/// The navigation page. The script is either embedded or loaded from `navigate.js`.
pub fn index_page(
    settings: &ModelSettings,
    tr: &Translations,
    script_data: &str,
    embed_scripts: bool,
) -> String {
    let script_content = if embed_scripts {
        format!("<script>\n{}\n\n\n{}\n</script>", script_data, NAVIGATE_JS)
    } else {
        format!(
            "<script>\n{}\n</script>\n\n<script src=\"navigate.js\"></script>",
            script_data
        )
    };
    format!(
        "<html>
{notice}
<head>
<meta charset=\"utf-8\">
{title}
<link rel=\"stylesheet\" type=\"text/css\" href=\"styles.css\">

{script}

</head>
<body class=\"mainpage\" onload=\"start_navigate()\">

<div class=\"bottomspace\">
    <a href='?'>{reset}</a>
</div>

<div id=\"container\"></div>

</body>
</html>
",
        notice = GENERATED_NOTICE,
        title = title_tag(None, settings),
        script = script_content,
        reset = esc(tr.get("Reset filters")),
    )
}

pub fn write_index(out_dir: &Path, content: &str, embed_scripts: bool) -> GenResult<()> {
    create_dir(out_dir)?;
    if !embed_scripts {
        write_page(&out_dir.join("navigate.js"), NAVIGATE_JS)?;
    }
    write_page(&out_dir.join("styles.css"), STYLES_CSS)?;
    write_page(&out_dir.join("index.html"), content)
}
