//! Levenshtein edit distance (insert, delete, substitute each cost 1).

/// Exact edit distance between `a` and `b`, measured in chars.
///
/// Classic dynamic programme over a `(len(b)+1) x (len(a)+1)` table, kept as
/// two rolling rows. Distance to an empty string is the other string's length.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    // prev[j] = distance(b[..i-1], a[..j])
    let mut prev: Vec<usize> = (0..=a.len()).collect();
    let mut curr = vec![0; a.len() + 1];

    for (i, bc) in b.iter().enumerate() {
        curr[0] = i + 1;
        for (j, ac) in a.iter().enumerate() {
            let cost = usize::from(ac != bc);
            curr[j + 1] = (prev[j + 1] + 1)
                .min(curr[j] + 1)
                .min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[a.len()]
}
