use std::collections::{HashMap, HashSet};

/// Make names unique by suffixing repeats: the second `X` becomes `X.1`,
/// the third `X.2`, and so on. First occurrences keep their text.
///
/// A generated suffix that would clash with a name already emitted is
/// skipped, so `["a", "a.1", "a"]` yields `["a", "a.1", "a.2"]`.
pub fn dedup_names<S: AsRef<str>>(names: &[S]) -> Vec<String> {
    let mut counters: HashMap<&str, usize> = HashMap::with_capacity(names.len());
    let mut emitted: HashSet<String> = HashSet::with_capacity(names.len());
    let mut result = Vec::with_capacity(names.len());

    for name in names {
        let name = name.as_ref();
        if emitted.insert(name.to_string()) {
            counters.entry(name).or_insert(1);
            result.push(name.to_string());
            continue;
        }

        let count = counters.entry(name).or_insert(1);
        loop {
            *count += 1;
            let candidate = format!("{}.{}", name, *count - 1);
            if emitted.insert(candidate.clone()) {
                result.push(candidate);
                break;
            }
        }
    }

    result
}
