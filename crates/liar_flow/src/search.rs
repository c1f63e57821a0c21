//! Substring search over an arbitrary JSON tree.

use serde_json::Value;

/// Where a match was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchSite {
    /// An object member name.
    Key,
    /// A string, number or boolean.
    Value,
}

/// One hit of [`search_json`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchMatch {
    /// JSON pointer of the matching member or scalar.
    pub path: String,
    /// The text that contained the needle.
    pub text: String,
    /// Whether the key or the value matched.
    pub site: MatchSite,
}

enum Frame<'a> {
    Key(String, &'a str),
    Node(String, &'a Value),
}

/// Returns every key and scalar under `root` containing `needle`, in
/// document order.
///
/// Traversal is depth-first with an explicit stack, so nesting depth is
/// bounded only by memory.
pub fn search_json(root: &Value, needle: &str, case_insensitive: bool) -> Vec<SearchMatch> {
    let needle = fold(needle, case_insensitive);
    let hit = |text: &str| fold(text, case_insensitive).contains(needle.as_str());

    let mut matches = Vec::new();
    let mut stack = vec![Frame::Node(String::new(), root)];

    while let Some(frame) = stack.pop() {
        match frame {
            Frame::Key(path, key) => {
                if hit(key) {
                    matches.push(SearchMatch {
                        path,
                        text: key.to_string(),
                        site: MatchSite::Key,
                    });
                }
            }
            Frame::Node(path, Value::Object(map)) => {
                // Pushed in reverse so members pop in map order, key before value.
                for (key, child) in map.iter().rev() {
                    let child_path = format!("{}/{}", path, escape_pointer(key));
                    stack.push(Frame::Node(child_path.clone(), child));
                    stack.push(Frame::Key(child_path, key));
                }
            }
            Frame::Node(path, Value::Array(items)) => {
                for (index, child) in items.iter().enumerate().rev() {
                    stack.push(Frame::Node(format!("{}/{}", path, index), child));
                }
            }
            Frame::Node(path, scalar) => {
                let text = match scalar {
                    Value::String(s) => s.clone(),
                    Value::Number(n) => n.to_string(),
                    Value::Bool(b) => b.to_string(),
                    _ => continue,
                };
                if hit(&text) {
                    matches.push(SearchMatch {
                        path,
                        text,
                        site: MatchSite::Value,
                    });
                }
            }
        }
    }
    matches
}

fn fold(text: &str, case_insensitive: bool) -> String {
    if case_insensitive {
        text.to_lowercase()
    } else {
        text.to_string()
    }
}

fn escape_pointer(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}
