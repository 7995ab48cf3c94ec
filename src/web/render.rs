//! HTML pages, built as plain strings.

use crate::core::breakdown::title_case;
use crate::domain::model::{Estimate, Feature};
use crate::utils::error::RequestError;

pub const NO_DETAILS: &str = "<strong>Error:</strong> No details available for this feature.";

const FORM_STYLE: &str = r#"
        body {
            font-family: Arial, sans-serif;
            background-color: #f4f4f4;
            color: #333;
            margin: 0;
            padding: 20px;
        }
        h1 {
            text-align: center;
        }
        form {
            max-width: 600px;
            margin: auto;
            padding: 20px;
            background: white;
            border-radius: 8px;
            box-shadow: 0 0 10px rgba(0, 0, 0, 0.1);
        }
        label {
            display: block;
            margin-bottom: 5px;
        }
        input[type="number"] {
            width: calc(100% - 10px);
            padding: 8px;
            margin-bottom: 15px;
            border-radius: 4px;
            border: 1px solid #ccc;
        }
        input[type="submit"] {
            background-color: #28a745;
            color: white;
            padding: 10px;
            border: none;
            border-radius: 4px;
            cursor: pointer;
        }
        input[type="submit"]:hover {
            background-color: #218838;
        }
        .details-link {
            font-size: 0.9em;
            color: #007bff;
            text-decoration: none;
            margin-left: 5px;
        }
        .details-link:hover {
            text-decoration: underline;
        }
        .hint {
            font-size: 0.85em;
            color: #555;
            margin-top: 5px;
            display: none;
        }
        input[type="number"]:focus + .hint {
            display: block;
        }
"#;

const BACK_LINK: &str = "<br><a href='/'>Back</a>";

fn page(title: &str, style: Option<&str>, body: &str) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    html.push_str("    <meta charset=\"utf-8\">\n");
    html.push_str(&format!("    <title>{}</title>\n", escape_html(title)));
    if let Some(style) = style {
        html.push_str(&format!("    <style>{}    </style>\n", style));
    }
    html.push_str("</head>\n<body>\n");
    html.push_str(body);
    html.push_str("\n</body>\n</html>\n");
    html
}

pub fn render_form() -> String {
    let mut body = String::new();
    body.push_str(
        "    <h1><a href=\"/details/COCOMO II\" style=\"text-decoration: none; color: inherit;\">\
         AI Project Cost Estimation Tool Using COCOMO-II</a></h1>\n",
    );
    body.push_str("    <form action=\"/predict\" method=\"post\">\n");
    for feature in Feature::ALL {
        let name = feature.name();
        body.push_str(&format!(
            "        <label>{}: <a class=\"details-link\" href=\"/details/{}\">Learn more</a></label>\n",
            feature.label(),
            name
        ));
        body.push_str(&format!(
            "        <input type=\"number\" step=\"any\" name=\"{}\" required>\n",
            name
        ));
        body.push_str(&format!(
            "        <p class=\"hint\" id=\"{}_hint\">{}</p>\n",
            name,
            feature.hint()
        ));
    }
    body.push_str("        <input type=\"submit\" value=\"Predict Cost\">\n");
    body.push_str("    </form>");

    page("Project Cost Estimation Tool", Some(FORM_STYLE), &body)
}

pub fn render_estimate(estimate: &Estimate) -> String {
    let mut table = String::from(
        "<table border='1' style='border-collapse: collapse; width: 80%; margin: auto;'>\
         <thead><tr><th>Feature</th><th>Value</th><th>Cost</th></tr></thead><tbody>",
    );
    for row in &estimate.breakdown {
        let value = row.value.map(format_value).unwrap_or_default();
        table.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape_html(&row.label),
            value,
            format_currency(row.cost)
        ));
    }
    table.push_str("</tbody></table>");

    let body = format!(
        "<h1>Estimated Project Cost: {}</h1>\n<h2>Cost Breakdown</h2>\n{}\n{}",
        format_currency(estimate.predicted_cost),
        table,
        BACK_LINK
    );
    page("Estimated Project Cost", None, &body)
}

/// One rendering function per error kind.
pub fn render_error(error: &RequestError) -> String {
    match error {
        RequestError::Validation { .. } => render_validation_error(error),
        RequestError::Parse { field, reason } => render_parse_error(field, reason),
        RequestError::Internal { .. } => render_internal_error(),
    }
}

fn error_page(message: &str) -> String {
    page(
        "Error",
        None,
        &format!("<h1>Error: {}</h1>{}", message, BACK_LINK),
    )
}

fn render_validation_error(error: &RequestError) -> String {
    error_page(&escape_html(&error.to_string()))
}

fn render_parse_error(field: &str, reason: &str) -> String {
    let label = field.replace('_', " ");
    error_page(&format!(
        "could not read {} ({})",
        escape_html(&label),
        escape_html(reason)
    ))
}

fn render_internal_error() -> String {
    error_page("the estimate could not be computed. Please try again later.")
}

/// Detail page. `detail` is trusted operator content; the name is not.
pub fn render_details(feature: &str, detail: Option<&str>) -> String {
    let title = escape_html(&title_case(&feature.replace('_', " ")));
    let body = format!(
        "    <h2>{}</h2>\n    <p>{}</p>\n    {}",
        title,
        detail.unwrap_or(NO_DETAILS),
        BACK_LINK
    );
    page(&format!("{} Details", title_case(&feature.replace('_', " "))), None, &body)
}

/// `$1,234.56`
pub fn format_currency(amount: f64) -> String {
    let formatted = format!("{:.2}", amount.abs());
    let (integer, fraction) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{}${}.{}", sign, grouped, fraction)
}

/// Input values keep a decimal point, e.g. `2000.0`.
pub fn format_value(value: f64) -> String {
    format!("{:?}", value)
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}
