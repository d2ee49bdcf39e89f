//! New/Edit Property dialog state.

use blsettings_channel::Channel;
use blsettings_types::error::Result;
use blsettings_types::{InvalidPropertyReason, PropertyName, PropertyValue, ValueType, validate};

/// Whether the dialog creates a property or edits an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    New,
    Edit,
}

impl EditMode {
    pub fn title(self) -> &'static str {
        match self {
            Self::New => "New Property",
            Self::Edit => "Edit Property",
        }
    }
}

/// Validation state of the name entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameStatus {
    /// Nothing typed yet; no error shown, saving disabled.
    Empty,
    Valid,
    /// Shown as the entry's error tooltip.
    Invalid(InvalidPropertyReason),
}

/// Which value widget is shown for the selected type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueField {
    None,
    Text,
    Number,
    Flag,
}

/// Model of the property dialog.
#[derive(Debug, Clone)]
pub struct PropertyEditor {
    mode: EditMode,
    name: String,
    value_type: ValueType,
    type_locked: bool,
    /// Value the property held when the dialog opened.
    original: Option<PropertyValue>,
    text: String,
    number: f64,
    /// 64-bit integer held outside `number`, which cannot represent every
    /// `int64`/`uint64` value.
    wide: Option<PropertyValue>,
    flag: bool,
}

impl PropertyEditor {
    /// Dialog for a property that does not exist yet.
    pub fn new_property() -> Self {
        Self {
            mode: EditMode::New,
            name: String::new(),
            value_type: ValueType::Empty,
            type_locked: false,
            original: None,
            text: String::new(),
            number: 0.0,
            wide: None,
            flag: false,
        }
    }

    /// Dialog for `name` on `channel`.
    ///
    /// When the property holds a value its type is selected and locked, and
    /// the value fields are preloaded.
    pub fn edit_property<C: Channel + ?Sized>(channel: &C, name: &PropertyName) -> Self {
        let mut editor = Self::new_property();
        editor.mode = EditMode::Edit;
        editor.name = name.to_string();
        editor.original = channel.get(name);
        if let Some(ty) = editor.original.as_ref().map(PropertyValue::value_type) {
            editor.select_type(ty);
            editor.type_locked = true;
        }
        editor
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn title(&self) -> &'static str {
        self.mode.title()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn name_editable(&self) -> bool {
        self.mode == EditMode::New
    }

    /// Replace the name entry's text. Ignored when editing.
    pub fn set_name(&mut self, text: &str) {
        if self.name_editable() {
            self.name = text.to_string();
        }
    }

    /// Prefill the name with the parent of the selected property.
    ///
    /// Inserts `property` up to and including its last `/` in front of the
    /// current text. Ignored unless `property` starts with `/`.
    pub fn set_parent_property(&mut self, property: &str) {
        if !self.name_editable() || !property.starts_with('/') {
            return;
        }
        let end = property.rfind('/').map_or(property.len(), |idx| idx + 1);
        self.name.insert_str(0, &property[..end]);
    }

    pub fn name_status(&self) -> NameStatus {
        if self.name.is_empty() {
            return NameStatus::Empty;
        }
        match validate(&self.name) {
            Ok(()) => NameStatus::Valid,
            Err(reason) => NameStatus::Invalid(reason),
        }
    }

    /// Whether the Save button is sensitive.
    pub fn can_save(&self) -> bool {
        self.name_status() == NameStatus::Valid
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    pub fn type_locked(&self) -> bool {
        self.type_locked
    }

    /// Select a value type. Returns `false` when the type is locked.
    pub fn set_value_type(&mut self, ty: ValueType) -> bool {
        if self.type_locked {
            log::debug!("Type of {} is locked to {}", self.name, self.value_type);
            return false;
        }
        self.select_type(ty);
        true
    }

    /// Reset the value fields for `ty`, then preload the original value when
    /// it has that type.
    fn select_type(&mut self, ty: ValueType) {
        self.value_type = ty;
        self.text.clear();
        self.number = 0.0;
        self.wide = None;
        self.flag = false;

        match &self.original {
            Some(PropertyValue::String(s)) if ty == ValueType::String => {
                self.text = s.clone();
            },
            Some(PropertyValue::Bool(b)) if ty == ValueType::Bool => self.flag = *b,
            Some(value) if value.value_type() == ty => {
                if let Some(n) = value.as_f64() {
                    self.number = n;
                }
                if is_wide(value) {
                    self.wide = Some(value.clone());
                }
            },
            _ => {},
        }
    }

    pub fn value_field(&self) -> ValueField {
        match self.value_type {
            ValueType::Empty => ValueField::None,
            ValueType::String => ValueField::Text,
            ValueType::Bool => ValueField::Flag,
            _ => ValueField::Number,
        }
    }

    // -- Value fields ----------------------------------------------------------

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
    }

    pub fn number(&self) -> f64 {
        self.number
    }

    /// Set the numeric entry, clamped to the selected type's range.
    pub fn set_number(&mut self, number: f64) {
        self.number = match self.value_type.numeric_range() {
            Some((min, max)) if !number.is_nan() => number.clamp(min, max),
            _ => 0.0,
        };
        self.wide = None;
    }

    /// Load `value` into the field for its type.
    ///
    /// Returns `false` without touching the fields when `value` does not
    /// match the selected type. `int64` and `uint64` values are kept exact.
    pub fn set_value(&mut self, value: &PropertyValue) -> bool {
        if value.value_type() != self.value_type {
            return false;
        }
        match value {
            PropertyValue::String(s) => self.set_text(s),
            PropertyValue::Bool(b) => self.set_flag(*b),
            number => {
                self.set_number(number.as_f64().unwrap_or_default());
                if is_wide(number) {
                    self.wide = Some(number.clone());
                }
            },
        }
        true
    }

    /// Decimal digits of the numeric entry.
    pub fn digits(&self) -> u32 {
        self.value_type.digits()
    }

    pub fn flag(&self) -> bool {
        self.flag
    }

    pub fn set_flag(&mut self, flag: bool) {
        self.flag = flag;
    }

    /// Label of the toggle button.
    pub fn flag_label(&self) -> &'static str {
        if self.flag { "TRUE" } else { "FALSE" }
    }

    /// Value the dialog would save; `None` for [`ValueType::Empty`].
    pub fn build_value(&self) -> Option<PropertyValue> {
        match self.value_type {
            ValueType::Empty => None,
            ValueType::String => Some(PropertyValue::String(self.text.clone())),
            ValueType::Bool => Some(PropertyValue::Bool(self.flag)),
            _ if self.wide.is_some() => self.wide.clone(),
            ty => PropertyValue::from_number(ty, self.number),
        }
    }

    /// Save to `channel`.
    ///
    /// Returns the written name, or `None` when the type is empty and
    /// nothing was written.
    pub fn commit<C: Channel + ?Sized>(&self, channel: &mut C) -> Result<Option<PropertyName>> {
        let Some(value) = self.build_value() else {
            return Ok(None);
        };
        let name = PropertyName::new(self.name.as_str())?;
        channel.set(&name, value)?;
        Ok(Some(name))
    }
}

fn is_wide(value: &PropertyValue) -> bool {
    matches!(value, PropertyValue::Int64(_) | PropertyValue::Uint64(_))
}

#[cfg(test)]
mod tests {
    use super::*;
    use blsettings_channel::MemoryChannel;
    use blsettings_types::BlsettingsError;

    fn pname(s: &str) -> PropertyName {
        PropertyName::new(s).unwrap()
    }

    #[test]
    fn new_property_defaults() {
        let e = PropertyEditor::new_property();
        assert_eq!(e.title(), "New Property");
        assert!(e.name_editable());
        assert_eq!(e.value_type(), ValueType::Empty);
        assert_eq!(e.value_field(), ValueField::None);
        assert_eq!(e.name_status(), NameStatus::Empty);
        assert!(!e.can_save());
        assert_eq!(e.build_value(), None);
    }

    #[test]
    fn name_validation() {
        let mut e = PropertyEditor::new_property();
        e.set_name("/general/theme");
        assert_eq!(e.name_status(), NameStatus::Valid);
        assert!(e.can_save());

        e.set_name("general");
        assert_eq!(
            e.name_status(),
            NameStatus::Invalid(InvalidPropertyReason::MissingLeadingSlash)
        );
        assert!(!e.can_save());
    }

    #[test]
    fn parent_property_prefix() {
        let mut e = PropertyEditor::new_property();
        e.set_parent_property("/Net/ThemeName");
        assert_eq!(e.name(), "/Net/");

        let mut e = PropertyEditor::new_property();
        e.set_name("Name");
        e.set_parent_property("/Xft/DPI");
        assert_eq!(e.name(), "/Xft/Name");

        let mut e = PropertyEditor::new_property();
        e.set_parent_property("relative/path");
        assert_eq!(e.name(), "");
    }

    #[test]
    fn edit_existing_locks_type() {
        let mut ch = MemoryChannel::new("xsettings");
        ch.set_int("/Xft/DPI", 120).unwrap();

        let mut e = PropertyEditor::edit_property(&ch, &pname("/Xft/DPI"));
        assert_eq!(e.title(), "Edit Property");
        assert!(!e.name_editable());
        assert!(e.type_locked());
        assert_eq!(e.value_type(), ValueType::Int);
        assert_eq!(e.number(), 120.0);

        assert!(!e.set_value_type(ValueType::String));
        assert_eq!(e.value_type(), ValueType::Int);

        e.set_name("/other");
        assert_eq!(e.name(), "/Xft/DPI");
        e.set_parent_property("/a/b");
        assert_eq!(e.name(), "/Xft/DPI");
    }

    #[test]
    fn edit_missing_property_leaves_type_open() {
        let ch = MemoryChannel::new("xsettings");
        let mut e = PropertyEditor::edit_property(&ch, &pname("/absent"));
        assert!(!e.type_locked());
        assert_eq!(e.value_type(), ValueType::Empty);
        assert!(e.set_value_type(ValueType::Bool));
        assert_eq!(e.value_field(), ValueField::Flag);
    }

    #[test]
    fn changing_type_resets_fields() {
        let mut e = PropertyEditor::new_property();
        e.set_value_type(ValueType::String);
        e.set_text("hello");
        e.set_value_type(ValueType::Double);
        assert_eq!(e.text(), "");
        assert_eq!(e.digits(), 4);
        e.set_number(2.5);
        e.set_value_type(ValueType::Int);
        assert_eq!(e.number(), 0.0);
        assert_eq!(e.digits(), 0);
    }

    #[test]
    fn number_is_clamped() {
        let mut e = PropertyEditor::new_property();
        e.set_value_type(ValueType::Uint);
        e.set_number(-5.0);
        assert_eq!(e.number(), 0.0);
        e.set_value_type(ValueType::Int);
        e.set_number(1e12);
        assert_eq!(e.number(), f64::from(i32::MAX));
        assert_eq!(e.build_value(), Some(PropertyValue::Int(i32::MAX)));
        e.set_number(f64::NAN);
        assert_eq!(e.number(), 0.0);
    }

    #[test]
    fn flag_label() {
        let mut e = PropertyEditor::new_property();
        e.set_value_type(ValueType::Bool);
        assert_eq!(e.flag_label(), "FALSE");
        e.set_flag(true);
        assert_eq!(e.flag_label(), "TRUE");
        assert_eq!(e.build_value(), Some(PropertyValue::Bool(true)));
    }

    #[test]
    fn commit_writes_value() {
        let mut ch = MemoryChannel::new("xfwm4");
        let mut e = PropertyEditor::new_property();
        e.set_parent_property("/general/theme");
        let name = format!("{}workspace_count", e.name());
        e.set_name(&name);
        e.set_value_type(ValueType::Int);
        e.set_number(4.7);

        let written = e.commit(&mut ch).unwrap();
        assert_eq!(written, Some(pname("/general/workspace_count")));
        assert_eq!(ch.get_int("/general/workspace_count", 0), 4);
    }

    #[test]
    fn commit_empty_type_is_noop() {
        let mut ch = MemoryChannel::new("x");
        let mut e = PropertyEditor::new_property();
        e.set_name("/a");
        assert_eq!(e.commit(&mut ch).unwrap(), None);
        assert!(ch.is_empty());
    }

    #[test]
    fn commit_invalid_name_fails() {
        let mut ch = MemoryChannel::new("x");
        let mut e = PropertyEditor::new_property();
        e.set_name("/a/");
        e.set_value_type(ValueType::String);
        assert!(matches!(
            e.commit(&mut ch),
            Err(BlsettingsError::InvalidProperty(
                InvalidPropertyReason::TrailingSeparator
            ))
        ));
    }

    #[test]
    fn edit_round_trip_string() {
        let mut ch = MemoryChannel::new("xsettings");
        ch.set_string("/Net/ThemeName", "Adwaita").unwrap();
        let mut e = PropertyEditor::edit_property(&ch, &pname("/Net/ThemeName"));
        assert_eq!(e.text(), "Adwaita");
        e.set_text("Greybird");
        e.commit(&mut ch).unwrap();
        assert_eq!(ch.get_string("/Net/ThemeName", ""), "Greybird");
    }

    #[test]
    fn wide_integers_stay_exact() {
        let mut ch = MemoryChannel::new("x");
        let mut e = PropertyEditor::new_property();
        e.set_name("/big");
        e.set_value_type(ValueType::Int64);
        assert!(e.set_value(&PropertyValue::Int64(9_007_199_254_740_993)));
        e.commit(&mut ch).unwrap();
        assert_eq!(
            ch.get(&pname("/big")),
            Some(PropertyValue::Int64(9_007_199_254_740_993))
        );

        e.set_value_type(ValueType::Uint64);
        assert!(e.set_value(&PropertyValue::Uint64(u64::MAX)));
        assert_eq!(e.build_value(), Some(PropertyValue::Uint64(u64::MAX)));

        // Typing into the spin button replaces the exact value.
        e.set_number(5.0);
        assert_eq!(e.build_value(), Some(PropertyValue::Uint64(5)));
    }

    #[test]
    fn editing_wide_integer_keeps_original() {
        let mut ch = MemoryChannel::new("x");
        ch.set(&pname("/big"), PropertyValue::Uint64(18_446_744_073_709_551_557))
            .unwrap();
        let e = PropertyEditor::edit_property(&ch, &pname("/big"));
        assert_eq!(
            e.build_value(),
            Some(PropertyValue::Uint64(18_446_744_073_709_551_557))
        );
    }

    #[test]
    fn set_value_rejects_other_types() {
        let mut e = PropertyEditor::new_property();
        e.set_value_type(ValueType::Int);
        assert!(!e.set_value(&PropertyValue::String("x".into())));
        assert!(e.set_value(&PropertyValue::Int(-3)));
        assert_eq!(e.build_value(), Some(PropertyValue::Int(-3)));
    }

    mod prop {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn number_stays_in_range(n in proptest::num::f64::ANY) {
                for ty in [ValueType::Int, ValueType::Uint, ValueType::Int64, ValueType::Uint64, ValueType::Double] {
                    let mut e = PropertyEditor::new_property();
                    e.set_value_type(ty);
                    e.set_number(n);
                    let (min, max) = ty.numeric_range().unwrap();
                    prop_assert!(e.number() >= min && e.number() <= max);
                }
            }

            #[test]
            fn can_save_matches_validator(name in "[/a-z_]{0,12}") {
                let mut e = PropertyEditor::new_property();
                e.set_name(&name);
                prop_assert_eq!(e.can_save(), !name.is_empty() && validate(&name).is_ok());
            }
        }
    }
}
