//! Minimum-salary extraction from free-text salary ranges.

/// Extracts the minimum wage from a loosely formatted range such as
/// `"$60k - $80k"` or `"50000 BDT"`.
///
/// Takes the first run of ASCII digits anywhere in the text; `0` when there is
/// none. If the text contains a `k` (either case) anywhere, the number is
/// multiplied by 1000.
///
/// Known quirk: the `k` is not required to sit next to the digits, so
/// `"up to 80 (negotiable, ask kindly)"` parses as 80000. Filter thresholds are
/// calibrated against this behaviour; keep it.
pub fn parse_min_salary(range: &str) -> u64 {
    let digits: String = range
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();

    if digits.is_empty() {
        return 0;
    }

    let value = digits.bytes().fold(0_u64, |acc, b| {
        acc.saturating_mul(10).saturating_add(u64::from(b - b'0'))
    });

    if range.to_lowercase().contains('k') {
        value.saturating_mul(1000)
    } else {
        value
    }
}
