//! Host-to-guest member name resolution
//!
//! Host accessor conventions (`getFoo`, `setFoo`, `isBar`) become guest
//! idioms (`foo`, `foo=`, `bar?`). Two distinct members resolving to the
//! same guest name are both kept: the later-discovered one is installed
//! under a numbered alias. Collisions are never an error.

/// What kind of member a name belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    /// A method; the flag records whether its declared return type is
    /// boolean (drives the trailing `?` marker)
    Method {
        /// Declared return type is boolean
        returns_bool: bool,
    },
    /// A non-constant field
    Field,
    /// A constant-shaped static final field
    Constant,
}

/// One name assignment made during binding generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignedName {
    /// Member name as declared on the host type
    pub original: String,
    /// Name installed on the proxy
    pub guest: String,
    /// Member kind the assignment was made for
    pub kind: MemberKind,
}

/// Resolve a host member name to its primary guest name.
pub fn resolve(host_name: &str, kind: MemberKind) -> String {
    match kind {
        // Constant-shaped static finals keep their literal spelling.
        MemberKind::Constant => host_name.to_string(),
        MemberKind::Field => {
            if is_constant_spelling(host_name) {
                host_name.to_string()
            } else {
                to_snake_case(host_name)
            }
        }
        MemberKind::Method { returns_bool } => {
            if let Some(rest) = accessor_rest(host_name, "get") {
                to_snake_case(rest)
            } else if let Some(rest) = accessor_rest(host_name, "set") {
                // Mutator marker
                format!("{}=", to_snake_case(rest))
            } else if let Some(rest) = accessor_rest(host_name, "is") {
                if returns_bool {
                    // Boolean-predicate marker
                    format!("{}?", to_snake_case(rest))
                } else {
                    to_snake_case(rest)
                }
            } else {
                to_snake_case(host_name)
            }
        }
    }
}

/// Secondary names a member is reachable under, besides its primary name.
///
/// Accessor-shaped methods stay callable under the snake_cased original
/// spelling (`getName` resolves to `name`, with `get_name` as alias).
pub fn alias_names(host_name: &str, primary: &str) -> Vec<String> {
    let literal = to_snake_case(host_name);
    if literal != primary {
        vec![literal]
    } else {
        Vec::new()
    }
}

/// First free numbered alias for a taken guest name: `name2`, `name3`, …
pub fn numbered_alias<F>(taken: F, base: &str) -> String
where
    F: Fn(&str) -> bool,
{
    let mut n = 2usize;
    loop {
        let candidate = format!("{}{}", base, n);
        if !taken(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

/// Accessor prefix match: the prefix must be followed by an uppercase
/// letter, so `settle` is not a setter.
fn accessor_rest<'a>(name: &'a str, prefix: &str) -> Option<&'a str> {
    let rest = name.strip_prefix(prefix)?;
    if rest.chars().next()?.is_uppercase() {
        Some(rest)
    } else {
        None
    }
}

fn is_constant_spelling(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

fn to_snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            let prev_lower =
                i > 0 && (chars[i - 1].is_lowercase() || chars[i - 1].is_ascii_digit());
            let prev_upper = i > 0 && chars[i - 1].is_uppercase();
            let next_lower = i + 1 < chars.len() && chars[i + 1].is_lowercase();
            if prev_lower || (prev_upper && next_lower) {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}
