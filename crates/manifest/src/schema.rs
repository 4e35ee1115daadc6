//! Per-category schema validation.
//!
//! Validation is a pure, synchronous walk over the raw JSON value. The
//! walk collects a violation for **every** offending field instead of
//! bailing on the first, so authors get one report per broken payload.
//! Only after a clean walk is the typed manifest assembled.

use std::collections::BTreeSet;

use serde_json::{Map, Value};
use tracing::{debug, instrument};

use crate::{
    category::Category,
    error::{ErrorKind, FieldViolation, Problem, Result},
    models::{Behavior, Blend, Manifest},
    RawManifest,
};

/// Checks `raw` against the schema for `category` and assembles the
/// typed manifest on success.
#[instrument(skip_all, fields(category = %category))]
pub fn validate(category: Category, raw: &RawManifest) -> Result<Manifest> {
    let mut check = Checker::default();
    if let Some(root) = check.typed_object(raw, "$") {
        match category {
            Category::Chapters => check_chapter(&mut check, root),
            Category::Enemies => check_enemies(&mut check, root),
            Category::Npcs => check_npcs(&mut check, root),
            Category::Sprites => check_sprites(&mut check, root),
            Category::Cinematics => check_cinematics(&mut check, root),
            Category::Sounds => check_sounds(&mut check, root),
            Category::Effects => check_effects(&mut check, root),
            Category::Items => check_items(&mut check, root),
            Category::Scenes => check_scenes(&mut check, root),
            Category::ChapterPlates => check_plates(&mut check, root),
        }
    }
    if !check.violations.is_empty() {
        debug!(violations = check.violations.len(), "payload failed schema walk");
        exn::bail!(ErrorKind::Schema { category, violations: check.violations });
    }
    build(category, raw).map_err(|err| {
        // The walk above vouched for every field, so assembly can only
        // trip on representation limits it does not model.
        exn::Exn::from(ErrorKind::Schema {
            category,
            violations: vec![FieldViolation::new("$", Problem::Shape(err.to_string()))],
        })
    })
}

fn build(category: Category, raw: &RawManifest) -> std::result::Result<Manifest, serde_json::Error> {
    use serde_json::from_value;
    Ok(match category {
        Category::Chapters => Manifest::Chapter(from_value(raw.clone())?),
        Category::Enemies => Manifest::Enemies(from_value(raw.clone())?),
        Category::Npcs => Manifest::Npcs(from_value(raw.clone())?),
        Category::Sprites => Manifest::Sprites(from_value(raw.clone())?),
        Category::Cinematics => Manifest::Cinematics(from_value(raw.clone())?),
        Category::Sounds => Manifest::Sounds(from_value(raw.clone())?),
        Category::Effects => Manifest::Effects(from_value(raw.clone())?),
        Category::Items => Manifest::Items(from_value(raw.clone())?),
        Category::Scenes => Manifest::Scenes(from_value(raw.clone())?),
        Category::ChapterPlates => Manifest::ChapterPlates(from_value(raw.clone())?),
    })
}

/// Collects violations across a whole payload walk.
#[derive(Default)]
struct Checker {
    violations: Vec<FieldViolation>,
}

fn field_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_owned()
    } else {
        format!("{prefix}.{key}")
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn tag_allowed(category: Category) -> &'static [&'static str] {
    match category {
        Category::Chapters => &["chapters"],
        Category::Enemies => &["enemies"],
        Category::Npcs => &["npcs"],
        Category::Sprites => &["sprites"],
        Category::Cinematics => &["cinematics"],
        Category::Sounds => &["sounds"],
        Category::Effects => &["effects"],
        Category::Items => &["items"],
        Category::Scenes => &["scenes"],
        Category::ChapterPlates => &["chapter-plates"],
    }
}

impl Checker {
    fn push(&mut self, field: impl Into<String>, problem: Problem) {
        self.violations.push(FieldViolation::new(field, problem));
    }

    fn typed_str<'v>(&mut self, value: &'v Value, field: &str) -> Option<&'v str> {
        match value.as_str() {
            Some(s) => Some(s),
            None => {
                self.push(field, Problem::Type { expected: "a string", found: type_name(value) });
                None
            }
        }
    }

    fn typed_u32(&mut self, value: &Value, field: &str) -> Option<u32> {
        match value.as_u64() {
            Some(n) if n <= u64::from(u32::MAX) => Some(n as u32),
            Some(_) => {
                self.push(
                    field,
                    Problem::Type { expected: "a 32-bit unsigned integer", found: "number" },
                );
                None
            }
            None => {
                self.push(
                    field,
                    Problem::Type {
                        expected: "a 32-bit unsigned integer",
                        found: type_name(value),
                    },
                );
                None
            }
        }
    }

    fn typed_f64(&mut self, value: &Value, field: &str) -> Option<f64> {
        match value.as_f64() {
            Some(n) => Some(n),
            None => {
                self.push(field, Problem::Type { expected: "a number", found: type_name(value) });
                None
            }
        }
    }

    fn typed_bool(&mut self, value: &Value, field: &str) -> Option<bool> {
        match value.as_bool() {
            Some(b) => Some(b),
            None => {
                self.push(field, Problem::Type { expected: "a boolean", found: type_name(value) });
                None
            }
        }
    }

    fn typed_array<'v>(&mut self, value: &'v Value, field: &str) -> Option<&'v Vec<Value>> {
        match value.as_array() {
            Some(items) => Some(items),
            None => {
                self.push(field, Problem::Type { expected: "an array", found: type_name(value) });
                None
            }
        }
    }

    fn typed_object<'v>(&mut self, value: &'v Value, field: &str) -> Option<&'v Map<String, Value>> {
        match value.as_object() {
            Some(map) => Some(map),
            None => {
                self.push(field, Problem::Type { expected: "an object", found: type_name(value) });
                None
            }
        }
    }

    fn typed_keyword(&mut self, value: &Value, field: &str, allowed: &'static [&'static str]) {
        let Some(s) = self.typed_str(value, field) else {
            return;
        };
        if !allowed.contains(&s) {
            self.push(field, Problem::Value { allowed, found: s.to_owned() });
        }
    }

    fn required<'v>(
        &mut self,
        map: &'v Map<String, Value>,
        prefix: &str,
        key: &str,
    ) -> Option<(String, &'v Value)> {
        let field = field_path(prefix, key);
        match map.get(key) {
            Some(value) => Some((field, value)),
            None => {
                self.push(field, Problem::Missing);
                None
            }
        }
    }

    fn required_string<'v>(
        &mut self,
        map: &'v Map<String, Value>,
        prefix: &str,
        key: &str,
    ) -> Option<&'v str> {
        let (field, value) = self.required(map, prefix, key)?;
        self.typed_str(value, &field)
    }

    fn required_u32(&mut self, map: &Map<String, Value>, prefix: &str, key: &str) -> Option<u32> {
        let (field, value) = self.required(map, prefix, key)?;
        self.typed_u32(value, &field)
    }

    fn required_f64(&mut self, map: &Map<String, Value>, prefix: &str, key: &str) -> Option<f64> {
        let (field, value) = self.required(map, prefix, key)?;
        self.typed_f64(value, &field)
    }

    fn required_keyword(
        &mut self,
        map: &Map<String, Value>,
        prefix: &str,
        key: &str,
        allowed: &'static [&'static str],
    ) {
        if let Some((field, value)) = self.required(map, prefix, key) {
            self.typed_keyword(value, &field, allowed);
        }
    }

    /// For `Option` model fields: absent and `null` are both fine.
    fn nullable_string(&mut self, map: &Map<String, Value>, prefix: &str, key: &str) {
        if let Some(value) = map.get(key)
            && !value.is_null()
        {
            self.typed_str(value, &field_path(prefix, key));
        }
    }

    fn nullable_u32(&mut self, map: &Map<String, Value>, prefix: &str, key: &str) {
        if let Some(value) = map.get(key)
            && !value.is_null()
        {
            self.typed_u32(value, &field_path(prefix, key));
        }
    }

    /// For defaulted model fields: absent is fine, `null` is not.
    fn optional_u32(&mut self, map: &Map<String, Value>, prefix: &str, key: &str) {
        if let Some(value) = map.get(key) {
            self.typed_u32(value, &field_path(prefix, key));
        }
    }

    fn optional_f64(&mut self, map: &Map<String, Value>, prefix: &str, key: &str) {
        if let Some(value) = map.get(key) {
            self.typed_f64(value, &field_path(prefix, key));
        }
    }

    fn optional_bool(&mut self, map: &Map<String, Value>, prefix: &str, key: &str) {
        if let Some(value) = map.get(key) {
            self.typed_bool(value, &field_path(prefix, key));
        }
    }

    fn optional_keyword(
        &mut self,
        map: &Map<String, Value>,
        prefix: &str,
        key: &str,
        allowed: &'static [&'static str],
    ) {
        if let Some(value) = map.get(key) {
            self.typed_keyword(value, &field_path(prefix, key), allowed);
        }
    }

    fn optional_string_array(&mut self, map: &Map<String, Value>, prefix: &str, key: &str) {
        let Some(value) = map.get(key) else {
            return;
        };
        let field = field_path(prefix, key);
        let Some(items) = self.typed_array(value, &field) else {
            return;
        };
        for (index, item) in items.iter().enumerate() {
            self.typed_str(item, &format!("{field}[{index}]"));
        }
    }

    /// The `category` field must carry the expected tag verbatim.
    fn tag(&mut self, map: &Map<String, Value>, category: Category) {
        let Some(tag) = self.required_string(map, "", "category") else {
            return;
        };
        if tag != category.tag() {
            self.push(
                "category",
                Problem::Value { allowed: tag_allowed(category), found: tag.to_owned() },
            );
        }
    }
}

fn check_chapter(check: &mut Checker, root: &Map<String, Value>) {
    check.required_u32(root, "", "id");
    check.required_string(root, "", "name");
    check.nullable_string(root, "", "summary");
    check.required_string(root, "", "scene");
    check.nullable_string(root, "", "soundtrack");
    check.optional_string_array(root, "", "unlocks");
}

fn check_enemies(check: &mut Checker, root: &Map<String, Value>) {
    check.tag(root, Category::Enemies);
    let Some((field, value)) = check.required(root, "", "enemies") else {
        return;
    };
    let Some(items) = check.typed_array(value, &field) else {
        return;
    };
    for (index, item) in items.iter().enumerate() {
        let prefix = format!("enemies[{index}]");
        let Some(map) = check.typed_object(item, &prefix) else {
            continue;
        };
        check.required_string(map, &prefix, "id");
        check.required_string(map, &prefix, "name");
        check.required_string(map, &prefix, "sprite");
        check.required_u32(map, &prefix, "health");
        check.required_f64(map, &prefix, "speed");
        check.required_keyword(map, &prefix, "behavior", &Behavior::ALLOWED);
    }
}

fn check_npcs(check: &mut Checker, root: &Map<String, Value>) {
    check.tag(root, Category::Npcs);

    // Species first, so NPC entries can be checked against the
    // declared keys.
    let mut declared: Option<BTreeSet<&str>> = None;
    if let Some((field, value)) = check.required(root, "", "species")
        && let Some(dict) = check.typed_object(value, &field)
    {
        for (name, entry) in dict {
            let prefix = format!("species.{name}");
            let Some(map) = check.typed_object(entry, &prefix) else {
                continue;
            };
            check.required_string(map, &prefix, "sprite");
            check.optional_string_array(map, &prefix, "traits");
        }
        declared = Some(dict.keys().map(String::as_str).collect());
    }

    let Some((field, value)) = check.required(root, "", "npcs") else {
        return;
    };
    let Some(items) = check.typed_array(value, &field) else {
        return;
    };
    for (index, item) in items.iter().enumerate() {
        let prefix = format!("npcs[{index}]");
        let Some(map) = check.typed_object(item, &prefix) else {
            continue;
        };
        check.required_string(map, &prefix, "id");
        check.required_string(map, &prefix, "name");
        if let Some(species) = check.required_string(map, &prefix, "species")
            && let Some(declared) = &declared
            && !declared.contains(species)
        {
            check.push(
                field_path(&prefix, "species"),
                Problem::Reference { missing: species.to_owned() },
            );
        }
        check.optional_string_array(map, &prefix, "dialogue");
    }
}

fn check_sprites(check: &mut Checker, root: &Map<String, Value>) {
    check.tag(root, Category::Sprites);
    let Some((field, value)) = check.required(root, "", "sprites") else {
        return;
    };
    let Some(items) = check.typed_array(value, &field) else {
        return;
    };
    for (index, item) in items.iter().enumerate() {
        let prefix = format!("sprites[{index}]");
        let Some(map) = check.typed_object(item, &prefix) else {
            continue;
        };
        check.required_string(map, &prefix, "id");
        check.required_string(map, &prefix, "path");
        check.required_u32(map, &prefix, "frame_width");
        check.required_u32(map, &prefix, "frame_height");
        check.optional_u32(map, &prefix, "frames");
    }
}

fn check_cinematics(check: &mut Checker, root: &Map<String, Value>) {
    check.tag(root, Category::Cinematics);
    let Some((field, value)) = check.required(root, "", "cinematics") else {
        return;
    };
    let Some(items) = check.typed_array(value, &field) else {
        return;
    };
    for (index, item) in items.iter().enumerate() {
        let prefix = format!("cinematics[{index}]");
        let Some(map) = check.typed_object(item, &prefix) else {
            continue;
        };
        check.required_string(map, &prefix, "id");
        check.required_string(map, &prefix, "path");
        check.optional_f64(map, &prefix, "fps");
        check.optional_bool(map, &prefix, "hold_last");
    }
}

fn check_sounds(check: &mut Checker, root: &Map<String, Value>) {
    check.tag(root, Category::Sounds);
    let Some((field, value)) = check.required(root, "", "sounds") else {
        return;
    };
    let Some(items) = check.typed_array(value, &field) else {
        return;
    };
    for (index, item) in items.iter().enumerate() {
        let prefix = format!("sounds[{index}]");
        let Some(map) = check.typed_object(item, &prefix) else {
            continue;
        };
        check.required_string(map, &prefix, "id");
        check.required_string(map, &prefix, "path");
        check.optional_f64(map, &prefix, "volume");
        check.optional_bool(map, &prefix, "looped");
    }
}

fn check_effects(check: &mut Checker, root: &Map<String, Value>) {
    check.tag(root, Category::Effects);
    let Some((field, value)) = check.required(root, "", "effects") else {
        return;
    };
    let Some(items) = check.typed_array(value, &field) else {
        return;
    };
    for (index, item) in items.iter().enumerate() {
        let prefix = format!("effects[{index}]");
        let Some(map) = check.typed_object(item, &prefix) else {
            continue;
        };
        check.required_string(map, &prefix, "id");
        check.required_string(map, &prefix, "sprite");
        check.required_u32(map, &prefix, "duration_ms");
        check.optional_keyword(map, &prefix, "blend", &Blend::ALLOWED);
    }
}

fn check_items(check: &mut Checker, root: &Map<String, Value>) {
    check.tag(root, Category::Items);
    let Some((field, value)) = check.required(root, "", "items") else {
        return;
    };
    let Some(items) = check.typed_array(value, &field) else {
        return;
    };
    for (index, item) in items.iter().enumerate() {
        let prefix = format!("items[{index}]");
        let Some(map) = check.typed_object(item, &prefix) else {
            continue;
        };
        check.required_string(map, &prefix, "id");
        check.required_string(map, &prefix, "name");
        check.required_string(map, &prefix, "icon");
        check.optional_bool(map, &prefix, "stackable");
        check.optional_u32(map, &prefix, "max_stack");
    }
}

fn check_scenes(check: &mut Checker, root: &Map<String, Value>) {
    check.tag(root, Category::Scenes);
    let Some((field, value)) = check.required(root, "", "scenes") else {
        return;
    };
    let Some(items) = check.typed_array(value, &field) else {
        return;
    };
    for (index, item) in items.iter().enumerate() {
        let prefix = format!("scenes[{index}]");
        let Some(map) = check.typed_object(item, &prefix) else {
            continue;
        };
        check.required_string(map, &prefix, "id");
        check.nullable_string(map, &prefix, "plate");
        check.nullable_string(map, &prefix, "music");
        check.nullable_u32(map, &prefix, "chapter");
    }
}

fn check_plates(check: &mut Checker, root: &Map<String, Value>) {
    check.tag(root, Category::ChapterPlates);
    let Some((field, value)) = check.required(root, "", "plates") else {
        return;
    };
    let Some(items) = check.typed_array(value, &field) else {
        return;
    };
    for (index, item) in items.iter().enumerate() {
        let prefix = format!("plates[{index}]");
        let Some(map) = check.typed_object(item, &prefix) else {
            continue;
        };
        check.required_u32(map, &prefix, "chapter");
        check.required_string(map, &prefix, "path");
    }
}
