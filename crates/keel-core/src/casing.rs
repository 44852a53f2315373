//! # Route Segment Case Conversion
//!
//! The API layer renders every route segment in kebab-case: lowercase words
//! separated by hyphens. Feature crates name modules however their own
//! conventions dictate (`PurchaseOrders`, `purchase_orders`, `purchaseOrders`)
//! and the registry normalizes the name at mount time.
//!
//! Word boundaries are detected at:
//! - explicit separators (`_`, `-`, whitespace),
//! - lower-to-upper transitions (`purchaseOrders`),
//! - the last upper of an acronym run (`HTTPServer` → `http`, `server`),
//! - letter/digit transitions (`V2Beta` → `v2`, `beta`).

/// Split a name into lowercase words at the boundaries described in the
/// module docs.
fn words(name: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let mut current = String::new();
    let chars: Vec<char> = name.chars().collect();

    let mut flush = |current: &mut String, out: &mut Vec<String>| {
        if !current.is_empty() {
            out.push(std::mem::take(current));
        }
    };

    for (i, &c) in chars.iter().enumerate() {
        if c == '_' || c == '-' || c.is_whitespace() {
            flush(&mut current, &mut out);
            continue;
        }

        let prev = i.checked_sub(1).and_then(|p| chars.get(p)).copied();
        let next = chars.get(i + 1).copied();

        let boundary = match prev {
            None => false,
            Some(p) => {
                // camelCase / PascalCase transition.
                (c.is_uppercase() && p.is_lowercase())
                    // End of an acronym run: HTTPServer -> http | server.
                    || (c.is_uppercase()
                        && p.is_uppercase()
                        && next.map_or(false, |n| n.is_lowercase()))
                    // Digit-to-letter transition: V2Beta -> v2 | beta.
                    || (c.is_alphabetic() && p.is_ascii_digit() && c.is_uppercase())
            }
        };

        if boundary {
            flush(&mut current, &mut out);
        }
        current.extend(c.to_lowercase());
    }
    flush(&mut current, &mut out);
    out
}

/// Convert a name to kebab-case: `PurchaseOrders` → `purchase-orders`.
///
/// Idempotent: kebab-case input comes back unchanged.
pub fn kebab_case(name: &str) -> String {
    words(name).join("-")
}

/// Convert a name to a human-readable phrase: `PurchaseOrder` →
/// `Purchase order`. Used to synthesize schema descriptions for components
/// that declare none.
pub fn humanize(name: &str) -> String {
    let mut phrase = words(name).join(" ");
    if let Some(first) = phrase.get(..1) {
        let upper = first.to_uppercase();
        phrase.replace_range(..1, &upper);
    }
    phrase
}
