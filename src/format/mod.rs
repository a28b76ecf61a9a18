//! Output rendering for comparison results (table, HTML, JSON, CSV).

pub mod export;

use crate::config::OutputFormat;
use crate::matcher::ComparisonResults;
use crate::serp::{Marketplace, ProductRecord};

const NO_PAIRS_MESSAGE: &str = "No matching products found.";
const NO_RECORDS_MESSAGE: &str = "No products found.";

const TABLE_STYLE: &str = "\
table { border-collapse: collapse; font-family: sans-serif; font-size: 14px; }
th, td { border: 1px solid #ddd; padding: 6px 10px; text-align: left; }
th { background: #f4f4f4; }
td img { display: block; }
a { text-decoration: none; }";

/// Formats comparison results and product listings for output.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats one comparison run's matched pairs.
    ///
    /// Zero pairs render an explicit message (table/HTML), a bare header
    /// (CSV), or a document with empty data (JSON), never an empty table.
    pub fn format_comparison(&self, results: &ComparisonResults) -> String {
        if results.is_empty() {
            return match self.format {
                OutputFormat::Json => export::to_json(&[]),
                OutputFormat::Csv => export::to_csv(&[]),
                _ => NO_PAIRS_MESSAGE.to_string(),
            };
        }

        match self.format {
            OutputFormat::Table => self.table_comparison(results),
            OutputFormat::Html => self.html_comparison(results),
            OutputFormat::Json => export::to_json(&export::from_results(results)),
            OutputFormat::Csv => export::to_csv(&export::from_results(results)),
        }
    }

    /// Formats a single-marketplace product listing.
    pub fn format_records(&self, records: &[ProductRecord], marketplace: Marketplace) -> String {
        if records.is_empty() {
            return match self.format {
                OutputFormat::Json => "[]".to_string(),
                _ => NO_RECORDS_MESSAGE.to_string(),
            };
        }

        match self.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(records).unwrap_or_else(|_| "[]".to_string())
            }
            _ => self.table_records(records, marketplace),
        }
    }

    // Terminal tables

    fn table_comparison(&self, results: &ComparisonResults) -> String {
        let sell = results.sell_on.label();
        let buy = results.sell_on.other().label();
        let title_width = 40;
        let price_width = 9;

        let mut lines = Vec::new();

        lines.push(format!(
            "{:<4} {:<title_width$} {:>price_width$} {:<title_width$} {:>price_width$} {:>9}",
            "#",
            format!("{} Title", sell),
            "Price",
            format!("{} Title", buy),
            "Price",
            "Profit"
        ));
        lines.push(format!(
            "{:-<4} {:-<title_width$} {:-<price_width$} {:-<title_width$} {:-<price_width$} {:-<9}",
            "", "", "", "", "", ""
        ));

        for (i, pair) in results.pairs.iter().enumerate() {
            lines.push(format!(
                "{:<4} {:<title_width$} {:>price_width$} {:<title_width$} {:>price_width$} {:>9}",
                i + 1,
                truncate(&pair.source.title, title_width),
                price_cell(pair.source.price),
                truncate(&pair.candidate.title, title_width),
                price_cell(pair.candidate.price),
                format!("{:+.2}", pair.profit)
            ));
        }

        lines.push(String::new());
        lines.push(format!("Total: {} pairs (selling on {})", results.count(), sell));

        lines.join("\n")
    }

    fn table_records(&self, records: &[ProductRecord], marketplace: Marketplace) -> String {
        let title_width = 60;
        let mut lines = Vec::new();

        lines.push(format!("{} results:", marketplace.label()));
        lines.push(format!("{:<4} {:>9} {:<title_width$}", "#", "Price", "Title"));
        lines.push(format!("{:-<4} {:-<9} {:-<title_width$}", "", "", ""));

        for (i, record) in records.iter().enumerate() {
            lines.push(format!(
                "{:<4} {:>9} {:<title_width$}",
                i + 1,
                price_cell(record.price),
                truncate(&record.title, title_width)
            ));
        }

        lines.push(String::new());
        lines.push(format!("Total: {} products", records.len()));

        lines.join("\n")
    }

    // HTML

    fn html_comparison(&self, results: &ComparisonResults) -> String {
        let sell = results.sell_on.label();
        let buy = results.sell_on.other().label();

        let mut rows = String::new();

        for pair in &results.pairs {
            let profit_color = if pair.profit >= 0.0 { "lime" } else { "red" };

            rows.push_str("        <tr>\n");
            rows.push_str(&thumbnail_cell(&pair.source));
            rows.push_str(&title_cell(&pair.source));
            rows.push_str(&price_html_cell(pair.source.price));
            rows.push_str(&thumbnail_cell(&pair.candidate));
            rows.push_str(&title_cell(&pair.candidate));
            rows.push_str(&price_html_cell(pair.candidate.price));
            rows.push_str(&format!(
                "            <td><div style=\"color:{}\">{:.2}$</div></td>\n",
                profit_color, pair.profit
            ));
            rows.push_str("        </tr>\n");
        }

        format!(
            "<style>\n{style}\n</style>\n\
             <table border=\"1\">\n\
             \x20   <thead>\n\
             \x20       <tr>\n\
             \x20           <th colspan=\"3\"><div>{sell}</div></th>\n\
             \x20           <th colspan=\"3\"><div>{buy}</div></th>\n\
             \x20           <th><div>Profit</div></th>\n\
             \x20       </tr>\n\
             \x20   </thead>\n\
             \x20   <tbody>\n{rows}\x20   </tbody>\n\
             </table>",
            style = TABLE_STYLE,
            sell = sell,
            buy = buy,
            rows = rows
        )
    }
}

fn truncate(title: &str, width: usize) -> String {
    if title.chars().count() > width {
        let kept: String = title.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        title.to_string()
    }
}

fn price_cell(price: Option<f64>) -> String {
    match price {
        Some(p) => format!("{:.2}", p),
        None => "N/A".to_string(),
    }
}

fn thumbnail_cell(record: &ProductRecord) -> String {
    match &record.thumbnail {
        Some(url) => format!(
            "            <td><div><img src=\"{}\" width=\"50\"></div></td>\n",
            html_escape(url)
        ),
        None => "            <td><div></div></td>\n".to_string(),
    }
}

fn title_cell(record: &ProductRecord) -> String {
    let title = html_escape(&record.title);
    match &record.link {
        Some(link) => format!(
            "            <td><div><a href=\"{}\" target=\"_blank\">{}</a></div></td>\n",
            html_escape(link),
            title
        ),
        None => format!("            <td><div>{}</div></td>\n", title),
    }
}

fn price_html_cell(price: Option<f64>) -> String {
    let text = match price {
        Some(p) => format!("{:.2}$", p),
        None => "N/A".to_string(),
    };
    format!("            <td><div>{}</div></td>\n", text)
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;").replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::MatchedPair;

    fn make_results(sell_on: Marketplace) -> ComparisonResults {
        let mut results = ComparisonResults::new("mug", sell_on);
        results.pairs.push(MatchedPair {
            source: ProductRecord {
                title: "Red Mug".to_string(),
                price: Some(5.0),
                thumbnail: Some("https://i5.walmartimages.com/a.jpg".to_string()),
                link: Some("https://www.walmart.com/ip/1".to_string()),
            },
            candidate: ProductRecord {
                title: "Red Coffee Mug".to_string(),
                price: Some(4.0),
                thumbnail: None,
                link: Some("https://www.ebay.com/itm/2".to_string()),
            },
            profit: 1.0,
        });
        results.pairs.push(MatchedPair {
            source: ProductRecord::new("Blue Mug", Some(3.0)),
            candidate: ProductRecord::new("Blue Mug XL", Some(5.5)),
            profit: -2.5,
        });
        results
    }

    fn empty_results() -> ComparisonResults {
        ComparisonResults::new("mug", Marketplace::Walmart)
    }

    // Table tests

    #[test]
    fn test_table_comparison() {
        let output = Formatter::new(OutputFormat::Table)
            .format_comparison(&make_results(Marketplace::Walmart));

        assert!(output.contains("Walmart Title"));
        assert!(output.contains("eBay Title"));
        assert!(output.contains("Red Mug"));
        assert!(output.contains("Red Coffee Mug"));
        assert!(output.contains("5.00"));
        assert!(output.contains("+1.00"));
        assert!(output.contains("-2.50"));
        assert!(output.contains("Total: 2 pairs (selling on Walmart)"));
    }

    #[test]
    fn test_table_orientation_flips_labels() {
        let output =
            Formatter::new(OutputFormat::Table).format_comparison(&make_results(Marketplace::Ebay));

        let ebay_col = output.find("eBay Title").unwrap();
        let walmart_col = output.find("Walmart Title").unwrap();
        assert!(ebay_col < walmart_col);
        assert!(output.contains("selling on eBay"));
    }

    #[test]
    fn test_table_missing_price_shows_na() {
        let mut results = make_results(Marketplace::Walmart);
        results.pairs[0].source.price = None;

        let output = Formatter::new(OutputFormat::Table).format_comparison(&results);
        assert!(output.contains("N/A"));
    }

    #[test]
    fn test_table_empty() {
        let output = Formatter::new(OutputFormat::Table).format_comparison(&empty_results());
        assert_eq!(output, "No matching products found.");
    }

    #[test]
    fn test_table_long_title_truncation() {
        let mut results = make_results(Marketplace::Walmart);
        results.pairs[0].source.title =
            "An exceedingly long product title that cannot possibly fit in one column".to_string();

        let output = Formatter::new(OutputFormat::Table).format_comparison(&results);
        assert!(output.contains("..."));
        assert!(!output.contains("possibly fit"));
    }

    // HTML tests

    #[test]
    fn test_html_comparison() {
        let output = Formatter::new(OutputFormat::Html)
            .format_comparison(&make_results(Marketplace::Walmart));

        assert!(output.starts_with("<style>"));
        assert!(output.contains("<th colspan=\"3\"><div>Walmart</div></th>"));
        assert!(output.contains("<th colspan=\"3\"><div>eBay</div></th>"));
        assert!(output.contains("<th><div>Profit</div></th>"));
        assert!(output.contains("<img src=\"https://i5.walmartimages.com/a.jpg\" width=\"50\">"));
        assert!(output
            .contains("<a href=\"https://www.walmart.com/ip/1\" target=\"_blank\">Red Mug</a>"));
        assert!(output.contains("5.00$"));
    }

    #[test]
    fn test_html_profit_colors() {
        let output = Formatter::new(OutputFormat::Html)
            .format_comparison(&make_results(Marketplace::Walmart));

        assert!(output.contains("color:lime\">1.00$"));
        assert!(output.contains("color:red\">-2.50$"));
    }

    #[test]
    fn test_html_zero_profit_is_lime() {
        let mut results = make_results(Marketplace::Walmart);
        results.pairs.truncate(1);
        results.pairs[0].profit = 0.0;

        let output = Formatter::new(OutputFormat::Html).format_comparison(&results);
        assert!(output.contains("color:lime\">0.00$"));
    }

    #[test]
    fn test_html_escapes_titles() {
        let mut results = make_results(Marketplace::Walmart);
        results.pairs[0].source.title = "Mug & Bowl <Set>".to_string();

        let output = Formatter::new(OutputFormat::Html).format_comparison(&results);
        assert!(output.contains("Mug &amp; Bowl &lt;Set&gt;"));
        assert!(!output.contains("<Set>"));
    }

    #[test]
    fn test_html_no_thumbnail_renders_empty_cell() {
        let output = Formatter::new(OutputFormat::Html)
            .format_comparison(&make_results(Marketplace::Walmart));

        // Candidate side of the first pair has no thumbnail
        assert!(output.contains("<td><div></div></td>"));
    }

    #[test]
    fn test_html_empty() {
        let output = Formatter::new(OutputFormat::Html).format_comparison(&empty_results());
        assert_eq!(output, "No matching products found.");
    }

    #[test]
    fn test_html_orientation_flips_header() {
        let output =
            Formatter::new(OutputFormat::Html).format_comparison(&make_results(Marketplace::Ebay));

        let ebay_col = output.find("<div>eBay</div>").unwrap();
        let walmart_col = output.find("<div>Walmart</div>").unwrap();
        assert!(ebay_col < walmart_col);
    }

    // JSON / CSV pass-through tests

    #[test]
    fn test_json_comparison_roundtrips() {
        let results = make_results(Marketplace::Walmart);
        let output = Formatter::new(OutputFormat::Json).format_comparison(&results);

        let parsed = export::from_json(&output).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].source.title, "Red Mug");
        assert_eq!(parsed[0].profit, 1.0);
    }

    #[test]
    fn test_json_empty_still_carries_schema() {
        let output = Formatter::new(OutputFormat::Json).format_comparison(&empty_results());
        assert!(output.contains("\"schema\""));
        assert!(export::from_json(&output).unwrap().is_empty());
    }

    #[test]
    fn test_csv_comparison_roundtrips() {
        let results = make_results(Marketplace::Walmart);
        let output = Formatter::new(OutputFormat::Csv).format_comparison(&results);

        let parsed = export::from_csv(&output).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[1].profit, -2.5);
    }

    #[test]
    fn test_csv_empty_is_bare_header() {
        let output = Formatter::new(OutputFormat::Csv).format_comparison(&empty_results());
        assert!(output.starts_with("source_marketplace,"));
        assert_eq!(output.lines().count(), 1);
    }

    // Record listing tests

    #[test]
    fn test_records_table() {
        let records =
            vec![ProductRecord::new("Red Mug", Some(5.0)), ProductRecord::new("Blue Mug", None)];

        let output =
            Formatter::new(OutputFormat::Table).format_records(&records, Marketplace::Walmart);

        assert!(output.contains("Walmart results:"));
        assert!(output.contains("Red Mug"));
        assert!(output.contains("5.00"));
        assert!(output.contains("N/A"));
        assert!(output.contains("Total: 2 products"));
    }

    #[test]
    fn test_records_json() {
        let records = vec![ProductRecord::new("Red Mug", Some(5.0))];

        let output = Formatter::new(OutputFormat::Json).format_records(&records, Marketplace::Ebay);

        assert!(output.starts_with('['));
        let parsed: Vec<ProductRecord> = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed, records);
    }

    #[test]
    fn test_records_empty() {
        let output = Formatter::new(OutputFormat::Table).format_records(&[], Marketplace::Walmart);
        assert_eq!(output, "No products found.");

        let output = Formatter::new(OutputFormat::Json).format_records(&[], Marketplace::Walmart);
        assert_eq!(output, "[]");
    }
}
