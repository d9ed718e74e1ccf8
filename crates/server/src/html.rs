//! HTML rendering of a [`RenderedView`].

use sheetview_core::render::{SheetSelector, SummaryView, TableView, WorkbookView};
use sheetview_core::{Body, Notice, NoticeLevel, RenderedView, SheetPanel};

const STYLE: &str = r"
body { font-family: sans-serif; margin: 0; display: flex; }
aside { width: 18rem; padding: 1rem; background: #f4f5f7; min-height: 100vh; }
main { flex: 1; padding: 1rem 2rem; overflow-x: auto; }
.row { display: flex; gap: .5rem; margin-bottom: .5rem; }
.row form { flex: 1; }
.row button { width: 100%; }
button.active { font-weight: bold; }
.notice { padding: .5rem; border-radius: 4px; margin: .5rem 0; }
.info { background: #e7f1fb; } .success { background: #e6f4ea; }
.warning { background: #fff4e5; } .error { background: #fdecea; }
table { border-collapse: collapse; margin: .5rem 0; }
th, td { border: 1px solid #ccc; padding: .25rem .5rem; }
.controls { display: flex; gap: .5rem; }
";

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Render the whole page.
pub fn render_page(view: &RenderedView) -> String {
    let messages = view.locale.messages();
    let dir = if view.locale.is_rtl() { "rtl" } else { "ltr" };

    let mut html = String::new();
    html.push_str(&format!(
        "<!DOCTYPE html>\n<html lang=\"{}\" dir=\"{dir}\">\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n",
        view.locale.code(),
        escape_html(&view.title),
    ));

    html.push_str("<aside>\n");
    html.push_str(&format!(
        "<form method=\"post\" action=\"/upload\" enctype=\"multipart/form-data\">\n<label>{}<br><input type=\"file\" name=\"file\" accept=\".xls,.xlsx\"></label>\n<button type=\"submit\">{}</button>\n</form>\n",
        escape_html(messages.upload_label),
        escape_html(messages.upload_button),
    ));
    html.push_str(&format!(
        "<form method=\"post\" action=\"/default\"><button type=\"submit\">{}</button></form>\n",
        escape_html(messages.use_default_button),
    ));
    render_notices(&mut html, &view.sidebar);
    html.push_str("</aside>\n<main>\n");

    html.push_str(&format!("<h1>{}</h1>\n", escape_html(&view.header)));
    for paragraph in &view.intro {
        html.push_str(&format!("<p>{}</p>\n", escape_html(paragraph)));
    }
    render_notices(&mut html, &view.notices);

    match &view.body {
        Body::Idle { prompt } => {
            html.push_str(&format!(
                "<div class=\"notice info\">{}</div>\n",
                escape_html(prompt)
            ));
        }
        Body::Workbook(workbook) => render_workbook(&mut html, view, workbook),
    }

    html.push_str(&format!(
        "<hr>\n<footer>{}</footer>\n</main>\n</body>\n</html>\n",
        escape_html(messages.footer)
    ));
    html
}

fn render_notices(html: &mut String, notices: &[Notice]) {
    for notice in notices {
        let class = match notice.level {
            NoticeLevel::Info => "info",
            NoticeLevel::Success => "success",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Error => "error",
        };
        html.push_str(&format!(
            "<div class=\"notice {class}\">{}</div>\n",
            escape_html(&notice.text)
        ));
    }
}

fn render_workbook(html: &mut String, view: &RenderedView, workbook: &WorkbookView) {
    render_selector(html, &workbook.selector);
    if let Some(prompt) = &workbook.prompt {
        html.push_str(&format!(
            "<div class=\"notice info\">{}</div>\n",
            escape_html(prompt)
        ));
    }
    if let Some(panel) = &workbook.panel {
        render_panel(html, view, panel);
    }
}

fn render_selector(html: &mut String, selector: &SheetSelector) {
    html.push_str(&format!("<h3>{}</h3>\n", escape_html(&selector.heading)));
    for row in &selector.rows {
        html.push_str("<div class=\"row\">\n");
        for button in row {
            let class = if button.active { " class=\"active\"" } else { "" };
            html.push_str(&format!(
                "<form method=\"post\" action=\"/sheet\"><input type=\"hidden\" name=\"name\" value=\"{}\"><button type=\"submit\" id=\"{}\"{class}>{}</button></form>\n",
                escape_html(&button.label),
                escape_html(&button.key),
                escape_html(&button.label),
            ));
        }
        html.push_str("</div>\n");
    }
}

fn render_panel(html: &mut String, view: &RenderedView, panel: &SheetPanel) {
    let messages = view.locale.messages();

    html.push_str(&format!("<h2>{}</h2>\n", escape_html(&panel.heading)));
    html.push_str(&format!(
        "<div class=\"controls\">\n<form method=\"post\" action=\"/full\"><button type=\"submit\">{}</button></form>\n<form method=\"post\" action=\"/reload\"><button type=\"submit\">{}</button></form>\n</div>\n",
        escape_html(messages.show_full_button),
        escape_html(messages.reload_button),
    ));
    if let Some(full) = &panel.full_sheet {
        render_table(html, full);
    }

    html.push_str("<form method=\"post\" action=\"/view\">\n");
    html.push_str(&format!(
        "<label>{}<br><input type=\"text\" name=\"search\" value=\"{}\"></label><br>\n",
        escape_html(messages.search_label),
        escape_html(&panel.search_text),
    ));
    html.push_str(&format!(
        "<label>{}<br><select name=\"column\" multiple size=\"{}\">\n",
        escape_html(messages.columns_label),
        panel.available_columns.len().clamp(1, 8),
    ));
    // Browsers submit selected options in document order, so the chosen
    // columns lead in pick order.
    for column in &panel.chosen_columns {
        html.push_str(&format!(
            "<option value=\"{0}\" selected>{0}</option>\n",
            escape_html(column)
        ));
    }
    for column in panel
        .available_columns
        .iter()
        .filter(|column| !panel.chosen_columns.contains(column))
    {
        html.push_str(&format!(
            "<option value=\"{0}\">{0}</option>\n",
            escape_html(column)
        ));
    }
    html.push_str("</select></label><br>\n");
    let checked = if panel.show_stats { " checked" } else { "" };
    html.push_str(&format!(
        "<label><input type=\"checkbox\" name=\"stats\"{checked}> {}</label><br>\n<button type=\"submit\">{}</button>\n</form>\n",
        escape_html(messages.stats_checkbox),
        escape_html(messages.apply_button),
    ));

    if let Some(result) = &panel.search_result {
        html.push_str(&format!("<p>{}</p>\n", escape_html(result)));
    }
    render_table(html, &panel.table);

    match &panel.summary {
        Some(SummaryView::Table(table)) => render_table(html, table),
        Some(SummaryView::Notice(text)) => {
            html.push_str(&format!(
                "<div class=\"notice info\">{}</div>\n",
                escape_html(text)
            ));
        }
        None => {}
    }

    html.push_str(&format!(
        "<p><a href=\"/download\" download=\"{}\">{}</a></p>\n",
        escape_html(&panel.download_name),
        escape_html(messages.download_button),
    ));
}

fn render_table(html: &mut String, table: &TableView) {
    html.push_str("<table>\n<thead><tr>");
    for column in &table.columns {
        html.push_str(&format!("<th>{}</th>", escape_html(column)));
    }
    html.push_str("</tr></thead>\n<tbody>\n");
    for row in &table.rows {
        html.push_str("<tr>");
        for cell in row {
            html.push_str(&format!("<td>{}</td>", escape_html(cell)));
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</tbody>\n</table>\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetview_core::{render_localized, Locale, SessionState, ViewEvent};
    use sheetview_sheet::{Book, CellValue, Sheet};

    fn book() -> Book {
        let mut book = Book::new();
        let sheet = Sheet::with_columns(
            "Plan",
            vec!["Task".into(), "Note".into()],
            vec![vec![
                CellValue::from("Survey"),
                CellValue::from("<b>north</b>"),
            ]],
        )
        .unwrap();
        book.add_sheet("Plan", sheet).unwrap();
        book
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">'&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_idle_page() {
        let (view, _) = render_localized(Locale::En, None, SessionState::new(), None);
        let html = render_page(&view);
        assert!(html.contains("lang=\"en\" dir=\"ltr\""));
        assert!(html.contains("enctype=\"multipart/form-data\""));
        assert!(html.contains("Upload an Excel file or use the default file"));
        assert!(!html.contains("action=\"/sheet\""));
    }

    #[test]
    fn test_sheet_page_escapes_cells() {
        let book = book();
        let (view, _) = render_localized(
            Locale::En,
            Some(&book),
            SessionState::new(),
            Some(ViewEvent::SelectSheet {
                name: "Plan".into(),
            }),
        );
        let html = render_page(&view);
        assert!(html.contains("id=\"btn_0\" class=\"active\">Plan</button>"));
        assert!(html.contains("<td>&lt;b&gt;north&lt;/b&gt;</td>"));
        assert!(html.contains("<option value=\"Task\" selected>Task</option>"));
        assert!(html.contains("href=\"/download\""));
    }

    #[test]
    fn test_chosen_columns_lead_the_select_in_pick_order() {
        let mut book = Book::new();
        let sheet = Sheet::from_data(vec![vec!["Item", "Year", "Amount"]]);
        book.add_sheet("Budget", sheet).unwrap();

        let (_, state) = render_localized(
            Locale::En,
            Some(&book),
            SessionState::new(),
            Some(ViewEvent::SelectSheet {
                name: "Budget".into(),
            }),
        );
        let (view, _) = render_localized(
            Locale::En,
            Some(&book),
            state,
            Some(ViewEvent::SetColumns {
                columns: vec!["Amount".into(), "Item".into()],
            }),
        );
        let html = render_page(&view);

        let amount = html.find("<option value=\"Amount\" selected>").unwrap();
        let item = html.find("<option value=\"Item\" selected>").unwrap();
        let year = html.find("<option value=\"Year\">").unwrap();
        assert!(amount < item);
        assert!(item < year);
    }

    #[test]
    fn test_arabic_page_is_rtl() {
        let (view, _) = render_localized(Locale::Ar, None, SessionState::new(), None);
        let html = render_page(&view);
        assert!(html.contains("lang=\"ar\" dir=\"rtl\""));
    }
}
