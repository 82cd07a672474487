/// Format a premium as whole rupees grouped in threes, e.g. `₹123,456`.
pub fn format_rupees(amount: f64) -> String {
    let rounded = amount.round();
    let negative = rounded < 0.0;
    let digits = format!("{:.0}", rounded.abs());
    let grouped = group_thousands(&digits);
    if negative {
        format!("-₹{grouped}")
    } else {
        format!("₹{grouped}")
    }
}

/// Insert a comma every three digits from the right
pub fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Minimal HTML escaping for text and attribute values
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rupees_are_rounded_and_grouped() {
        assert_eq!(format_rupees(0.0), "₹0");
        assert_eq!(format_rupees(999.4), "₹999");
        assert_eq!(format_rupees(999.5), "₹1,000");
        assert_eq!(format_rupees(12_345.0), "₹12,345");
        assert_eq!(format_rupees(1_234_567.89), "₹1,234,568");
    }

    #[test]
    fn grouping_handles_short_inputs() {
        assert_eq!(group_thousands("1"), "1");
        assert_eq!(group_thousands("123"), "123");
        assert_eq!(group_thousands("1234"), "1,234");
        assert_eq!(group_thousands("123456"), "123,456");
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(
            html_escape(r#"Diabetes & <b>"x"</b>"#),
            "Diabetes &amp; &lt;b&gt;&quot;x&quot;&lt;/b&gt;"
        );
    }
}
