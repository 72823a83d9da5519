/// Build pretty tree-style labels in **O(n)**.
///
/// * `rows` are the visible directories in pre-order, each as `(depth, name)`
///   with the root at depth 0.
/// * Whether a row is the last among its siblings is derived from the rows
///   themselves, so filtered views still draw closed branches.
pub fn build_tree_labels(rows: &[(usize, &str)]) -> Vec<String> {
    let n = rows.len();

    // PASS #1 (backwards) – a row is last if no sibling follows before the
    // parent's subtree ends.
    let mut is_last_vec = vec![false; n];
    let mut sibling_seen: Vec<bool> = Vec::new();
    for (idx, &(depth, _)) in rows.iter().enumerate().rev() {
        if sibling_seen.len() <= depth {
            sibling_seen.resize(depth + 1, false);
        }
        is_last_vec[idx] = !sibling_seen[depth];
        sibling_seen[depth] = true;
        // Deeper rows before this one belong to an earlier sibling's subtree.
        sibling_seen.truncate(depth + 1);
    }

    // PASS #2 – draw, keeping whether each open ancestor was a last child.
    let mut labels = Vec::with_capacity(n);
    let mut ancestor_is_last: Vec<bool> = Vec::new();
    for (idx, &(depth, name)) in rows.iter().enumerate() {
        ancestor_is_last.truncate(depth);

        let mut prefix = String::new();
        if depth > 0 {
            // Skip the root's column; it has no connector.
            for &was_last in ancestor_is_last.iter().skip(1) {
                prefix.push_str(if was_last { "   " } else { "│  " });
            }
            prefix.push_str(if is_last_vec[idx] { "└─ " } else { "├─ " });
        }
        labels.push(format!("{}{}/", prefix, name));

        while ancestor_is_last.len() < depth {
            // Gap in depths; only happens for malformed input.
            ancestor_is_last.push(true);
        }
        ancestor_is_last.push(is_last_vec[idx]);
    }
    labels
}
