use serde::Serialize;

/// Keep the last four digits of a card number.
pub fn mask_card_number(card: &str) -> String {
    let digits = card.chars().count();
    if digits > 4 {
        let tail: String = card.chars().skip(digits - 4).collect();
        "*".repeat(digits - 4) + &tail
    } else {
        card.to_string()
    }
}

fn normalize(key: &str) -> String {
    key.chars()
        .filter(|c| *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Return true if a key name likely holds a PAN/card number.
fn is_pan_key(key: &str) -> bool {
    let k = normalize(key);
    k == "pan" || k == "cardnumber" || (k.contains("card") && k.contains("num"))
}

/// Return true if a key name likely holds a security code.
fn is_cvv_key(key: &str) -> bool {
    let k = normalize(key);
    k.contains("cvv") || k.contains("cvc") || k.contains("securitycode") || k.contains("cardverification")
}

/// Serialize `v` and mask card data in it. Used only for log output.
pub fn secure_serializable(v: impl Serialize) -> serde_json::Value {
    match serde_json::to_value(v) {
        Ok(value) => secure_value(&value),
        Err(e) => serde_json::Value::String(format!("<unserializable: {e}>")),
    }
}

pub fn secure_value(v: &serde_json::Value) -> serde_json::Value {
    use serde_json::Value;

    match v {
        Value::Object(map) => {
            let mut new = serde_json::Map::with_capacity(map.len());
            for (k, val) in map {
                let is_pan = is_pan_key(k);
                let is_cvv = is_cvv_key(k);
                let new_val = match val {
                    Value::String(s) if is_pan => Value::String(mask_card_number(s)),
                    Value::Number(n) if is_pan => Value::String(mask_card_number(&n.to_string())),
                    Value::String(_) | Value::Number(_) if is_cvv => Value::String("***".to_string()),
                    _ => secure_value(val),
                };
                new.insert(k.clone(), new_val);
            }
            Value::Object(new)
        }
        Value::Array(arr) => Value::Array(arr.iter().map(secure_value).collect()),
        other => other.clone(),
    }
}
