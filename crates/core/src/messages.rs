//! User-facing text, per locale.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Language of the rendered page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ar,
}

impl Locale {
    #[must_use]
    pub fn messages(self) -> &'static Messages {
        match self {
            Locale::En => &EN,
            Locale::Ar => &AR,
        }
    }

    /// `lang` attribute value.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Ar => "ar",
        }
    }

    /// Whether text runs right to left.
    #[must_use]
    pub fn is_rtl(self) -> bool {
        matches!(self, Locale::Ar)
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "en" => Ok(Locale::En),
            "ar" => Ok(Locale::Ar),
            other => Err(format!("unknown locale '{other}' (expected en or ar)")),
        }
    }
}

/// Message catalogue. Templates use `{name}`-style placeholders.
#[derive(Debug)]
pub struct Messages {
    pub page_title: &'static str,
    pub header: &'static str,
    pub intro: &'static [&'static str],
    pub upload_label: &'static str,
    pub upload_button: &'static str,
    pub no_upload_hint: &'static str,
    pub use_default_button: &'static str,
    pub uploaded: &'static str,
    pub opened_default: &'static str,
    pub missing_default_path: &'static str,
    pub unreadable_workbook: &'static str,
    pub unsupported_extension: &'static str,
    pub idle_prompt: &'static str,
    pub sheets_heading: &'static str,
    pub pick_sheet_prompt: &'static str,
    pub sheet_heading: &'static str,
    pub sheet_not_found: &'static str,
    pub show_full_button: &'static str,
    pub reload_button: &'static str,
    pub search_label: &'static str,
    pub columns_label: &'static str,
    pub apply_button: &'static str,
    pub search_result: &'static str,
    pub stats_checkbox: &'static str,
    pub no_numeric_data: &'static str,
    pub download_button: &'static str,
    pub footer: &'static str,
}

impl Messages {
    pub fn uploaded(&self, name: &str) -> String {
        fill(self.uploaded, &[("name", name)])
    }

    pub fn opened_default(&self, path: &str) -> String {
        fill(self.opened_default, &[("path", path)])
    }

    pub fn unsupported_extension(&self, name: &str) -> String {
        fill(self.unsupported_extension, &[("name", name)])
    }

    pub fn sheet_heading(&self, name: &str, rows: usize) -> String {
        fill(self.sheet_heading, &[("name", name), ("rows", &rows.to_string())])
    }

    pub fn sheet_not_found(&self, name: &str) -> String {
        fill(self.sheet_not_found, &[("name", name)])
    }

    pub fn search_result(&self, count: usize) -> String {
        fill(self.search_result, &[("count", &count.to_string())])
    }
}

fn fill(template: &str, args: &[(&str, &str)]) -> String {
    args.iter().fold(template.to_string(), |text, (key, value)| {
        text.replace(&format!("{{{key}}}"), value)
    })
}

static EN: Messages = Messages {
    page_title: "Data viewer",
    header: "📊 Excel data viewer: press a button to show a sheet",
    intro: &[
        "A simple web app that reads an Excel file (.xls or .xlsx) and shows its sheets as buttons.",
        "Upload a file from your device, or let the app try to open the default file (if present).",
        "Press a sheet name to show its content right away, with search, column and download tools.",
    ],
    upload_label: "Upload an Excel file (.xls or .xlsx)",
    upload_button: "Upload",
    no_upload_hint: "No file uploaded. The app can try to open the default file (if present).",
    use_default_button: "Use the default file (if present)",
    uploaded: "File uploaded: {name}",
    opened_default: "Opened file from: {path}",
    missing_default_path: "Default file not found. Upload a file instead.",
    unreadable_workbook: "Could not read the Excel file. Make sure the file is a valid workbook.",
    unsupported_extension: "Unsupported file type: {name}. Upload an .xls or .xlsx file.",
    idle_prompt: "Upload an Excel file or use the default file from the sidebar to start.",
    sheets_heading: "Available sheets:",
    pick_sheet_prompt: "Press the name of the sheet you want to view using the buttons above.",
    sheet_heading: "Sheet: {name} (rows: {rows})",
    sheet_not_found: "Sheet not found: {name}",
    show_full_button: "Show full sheet",
    reload_button: "Reload",
    search_label: "Search (keep rows where any cell contains):",
    columns_label: "Columns to show (default: all)",
    apply_button: "Apply",
    search_result: "Search result: {count} rows",
    stats_checkbox: "Show a short statistical summary (numeric columns)",
    no_numeric_data: "There are no numeric columns to summarize.",
    download_button: "Download the visible rows as CSV",
    footer: "Sheets, columns and search can be customised for a specific dataset.",
};

static AR: Messages = Messages {
    page_title: "نظام عرض البيانات",
    header: "📊 عرض بيانات Excel: اضغط زرًا لعرض البيانات",
    intro: &[
        "هذا تطبيق ويب بسيط يقرأ ملف Excel (.xls أو .xlsx) ويُظهِر شيتات الملف كأزرار.",
        "يمكنك رفع الملف من جهازك أو ترك التطبيق ليحاول فتح الملف الافتراضي (إن وُجد).",
        "بعد الضغط على اسم الشيت يظهر المحتوى فورًا مع أدوات فرز/بحث/تحميل.",
    ],
    upload_label: "رفع ملف Excel (.xls أو .xlsx)",
    upload_button: "رفع",
    no_upload_hint: "لم تقم برفع ملف. سيحاول التطبيق فتح الملف الافتراضي (إن وُجد).",
    use_default_button: "استخدم الملف الافتراضي (إن وُجد)",
    uploaded: "تم رفع الملف: {name}",
    opened_default: "تم فتح الملف من: {path}",
    missing_default_path: "لم يتم العثور على الملف الافتراضي. ارفع ملفًا بدلًا من ذلك.",
    unreadable_workbook: "حدث خطأ عند قراءة ملف Excel. تأكد من أن الملف صالح.",
    unsupported_extension: "نوع الملف غير مدعوم: {name}. ارفع ملف .xls أو .xlsx.",
    idle_prompt: "ارفع ملف Excel أو استخدم الملف الافتراضي من الشريط الجانبي لبدء العرض.",
    sheets_heading: "الشيتات المتاحة:",
    pick_sheet_prompt: "اضغط على اسم الشيت الذي تريده من الأزرار أعلاه لعرضه.",
    sheet_heading: "الشيت: {name} (عدد الصفوف: {rows})",
    sheet_not_found: "الشيت غير موجود: {name}",
    show_full_button: "عرض كامل",
    reload_button: "إعادة تحميل/تحديث",
    search_label: "بحث (فلترة أي خلية تحتوي على):",
    columns_label: "اختر أعمدة للعرض (افتراضي: الكل)",
    apply_button: "تطبيق",
    search_result: "نتيجة البحث: {count} صفوف",
    stats_checkbox: "أظهر ملخص إحصائي مختصر (للأعمدة الرقمية)",
    no_numeric_data: "لا يوجد أعمدة رقمية لعرض الملخص.",
    download_button: "تحميل الجزء المعروض كملف CSV",
    footer: "يمكن تخصيص الشيتات والأعمدة والبحث لمجموعة بيانات محددة.",
};
