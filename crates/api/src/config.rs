//! Types for use when configuring fullsync modules.

use crate::*;

/// helper transcode function
fn tc<S: serde::Serialize, D: serde::de::DeserializeOwned>(
    s: &S,
) -> FsResult<D> {
    serde_json::from_str(
        &serde_json::to_string(s)
            .map_err(|e| FsError::other_src("encode", e))?,
    )
    .map_err(|e| FsError::other_src("decode", e))
}

/// Denotes a type used to configure a specific fullsync module.
///
/// A module config is a struct with a single camelCase field named after
/// the module, wrapping that module's actual parameters. This lets several
/// modules share one [Config] document without colliding.
pub trait ModConfig:
    'static
    + Sized
    + Default
    + std::fmt::Debug
    + serde::Serialize
    + serde::de::DeserializeOwned
    + Send
    + Sync
{
}

/// Fullsync configuration.
///
/// This is a loose json document, typically loaded from a file by the
/// process that hosts the engine.
#[derive(Debug, Default, Clone, serde::Serialize, serde::Deserialize)]
pub struct Config(serde_json::Map<String, serde_json::Value>);

impl Config {
    /// Load a config from a json string.
    pub fn from_json(json: &str) -> FsResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| FsError::other_src("invalid config json", e))
    }

    /// Render this config as pretty json.
    pub fn to_json(&self) -> FsResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| FsError::other_src("encode config", e))
    }

    /// Write the top-level properties of a module config into this
    /// config, replacing any previous values for those modules.
    pub fn set_module_config<M: ModConfig>(&mut self, m: &M) -> FsResult<()> {
        let map: serde_json::Map<String, serde_json::Value> = tc(m)?;
        for (k, v) in map {
            self.0.insert(k, v);
        }
        Ok(())
    }

    /// Extract a module config. Missing modules and missing properties
    /// fall back to their defaults.
    pub fn get_module_config<M: ModConfig>(&self) -> FsResult<M> {
        let mut out: serde_json::Map<String, serde_json::Value> =
            tc(&M::default())?;
        for (k, v) in out.iter_mut() {
            if let Some(set) = self.0.get(k) {
                merge(v, set);
            }
        }
        tc(&out)
    }
}

fn merge(base: &mut serde_json::Value, over: &serde_json::Value) {
    match (base, over) {
        (serde_json::Value::Object(base), serde_json::Value::Object(over)) => {
            for (k, v) in over {
                match base.get_mut(k) {
                    Some(b) => merge(b, v),
                    None => {
                        base.insert(k.clone(), v.clone());
                    }
                }
            }
        }
        (base, over) => *base = over.clone(),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Inner {
        a_val: u32,
        b_val: String,
    }

    impl Default for Inner {
        fn default() -> Self {
            Self {
                a_val: 42,
                b_val: "hello".into(),
            }
        }
    }

    #[derive(
        Debug, Default, Clone, PartialEq, serde::Serialize, serde::Deserialize,
    )]
    #[serde(rename_all = "camelCase")]
    struct TestModConfig {
        test_mod: Inner,
    }

    impl ModConfig for TestModConfig {}

    #[test]
    fn missing_module_is_default() {
        let config = Config::default();
        let m: TestModConfig = config.get_module_config().unwrap();
        assert_eq!(TestModConfig::default(), m);
    }

    #[test]
    fn partial_module_keeps_defaults() {
        let config = Config::from_json(r#"{"testMod":{"aVal":7}}"#).unwrap();
        let m: TestModConfig = config.get_module_config().unwrap();
        assert_eq!(7, m.test_mod.a_val);
        assert_eq!("hello", m.test_mod.b_val);
    }

    #[test]
    fn set_then_get() {
        let mut config = Config::default();
        let m = TestModConfig {
            test_mod: Inner {
                a_val: 1,
                b_val: "x".into(),
            },
        };
        config.set_module_config(&m).unwrap();

        let json = config.to_json().unwrap();
        assert!(json.contains("\"testMod\""));

        let config = Config::from_json(&json).unwrap();
        assert_eq!(m, config.get_module_config::<TestModConfig>().unwrap());
    }
}
