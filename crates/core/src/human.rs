/// Compact form for totals, e.g. `20.34 M`.
pub fn human_value(v: f64) -> String {
    let mut n = v;
    let units = ["", "K", "M", "B", "T"];
    let mut u = 0;
    while n.abs() >= 1000.0 && u < units.len() - 1 {
        n /= 1000.0;
        u += 1;
    }
    if u == 0 {
        format_value(n)
    } else {
        format!("{:.2} {}", n, units[u])
    }
}

/// Plain form for attributes and tooltips: integral values print without a fraction.
pub fn format_value(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(20338986.0), "20338986");
        assert_eq!(format_value(2.5), "2.5");
    }

    #[test]
    fn test_human_value() {
        assert_eq!(human_value(950.0), "950");
        assert_eq!(human_value(20338986.0), "20.34 M");
        assert_eq!(human_value(1_500.0), "1.50 K");
    }
}
