use std::{fs, path::Path};

use serde_json::Value;
use tracing::debug;

use crate::{bail, format_err, registry::Registry, RawFlags, RawValue, ValidationError, Warning};

/// Merges the JSON object stored at `path` into `raw`.
///
/// Keys are configuration keys, not flag tokens. Flags already present on the
/// command line take precedence over the file.
pub(crate) fn merge(
    path: &Path,
    raw: &mut RawFlags,
    registry: &Registry,
) -> Result<Vec<Warning>, ValidationError> {
    let text = fs::read_to_string(path)
        .map_err(|err| format_err!("Can't read config file `{}`, {err}", path.display()))?;
    let json = serde_json::from_str::<Value>(&text)
        .map_err(|err| format_err!("Can't parse config file `{}`, {err}", path.display()))?;
    let Value::Object(entries) = json else {
        bail!("Can't parse config file `{}`, expected a JSON object", path.display())
    };

    let mut warnings = Vec::new();
    for (key, value) in entries {
        if value.is_null() {
            continue;
        }
        let Some(opt) = registry.get(&key) else {
            warnings.push(Warning::UnknownConfigKey(key));
            continue;
        };
        let tokens = registry.tokens(opt);
        if tokens.iter().any(|(token, _)| raw.contains_key(token)) {
            continue;
        }
        let text = match value {
            Value::Null => continue,
            Value::String(it) => it,
            Value::Bool(it) => it.to_string(),
            Value::Number(it) => it.to_string(),
            Value::Array(_) | Value::Object(_) => {
                bail!("Can't parse config file `{}`, `{key}` must be a scalar", path.display())
            }
        };
        debug!(key = %key, "value from config file");
        raw.insert(opt.long_flag(), RawValue::Value(text));
    }
    Ok(warnings)
}
