use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result, bail};

use blsettings_appearance::{
    AppearanceSettings, SchemeColor, ScreenGeometry, compute_dpi, decode, extract_scheme_from_file,
};
use blsettings_channel::{Channel, ChannelStore, XSETTINGS_CHANNEL};
use blsettings_editor::{NameStatus, PropertyEditor};
use blsettings_manager::{ReturnAction, SettingsIndex};
use blsettings_types::{DebugDomains, PropertyName, PropertyValue, ValueType, validate};

use crate::config::AppConfig;

pub const USAGE: &str = "\
Usage: blsettings <command> [args...]

Commands:
  validate <property>...                  check property names
  scheme <scheme-string>                  decode a color scheme
  rc <gtkrc-file>                         extract and decode an RC file's colors
  get <channel> <property>                print a property
  set <channel> <property> <type> <value> set a property (types: string, bool,
                                          int, double, uint, int64, uint64)
  reset <channel> <property>              remove a property
  list <channel>                          list a channel's properties
  appearance                              summarize the xsettings channel
  dpi <w_px> <h_px> <w_mm> <h_mm>         compute a screen's DPI
  search <menu.toml> [<text>]             filter the settings manager";

/// Shared state of a single invocation.
pub struct Invocation<'a> {
    pub config: &'a AppConfig,
    pub debug: DebugDomains,
}

/// Run one command, writing its output to `out`.
pub fn run(args: &[String], ctx: &Invocation<'_>, out: &mut dyn Write) -> Result<()> {
    let Some((command, rest)) = args.split_first() else {
        bail!("missing command\n\n{USAGE}");
    };
    let rest: Vec<&str> = rest.iter().map(String::as_str).collect();

    match (command.as_str(), rest.as_slice()) {
        ("validate", props) if !props.is_empty() => cmd_validate(props, out),
        ("scheme", [scheme]) => cmd_scheme(scheme, out),
        ("rc", [path]) => cmd_rc(Path::new(path), out),
        ("get", [channel, property]) => cmd_get(ctx, channel, property, out),
        ("set", [channel, property, ty, value]) => cmd_set(ctx, channel, property, ty, value, out),
        ("reset", [channel, property]) => cmd_reset(ctx, channel, property, out),
        ("list", [channel]) => cmd_list(ctx, channel, out),
        ("appearance", []) => cmd_appearance(ctx, out),
        ("dpi", [w, h, wmm, hmm]) => cmd_dpi(ctx, [w, h, wmm, hmm], out),
        ("search", [menu]) => cmd_search(Path::new(menu), "", out),
        ("search", [menu, text]) => cmd_search(Path::new(menu), text, out),
        ("help" | "--help" | "-h", []) => {
            writeln!(out, "{USAGE}")?;
            Ok(())
        },
        (cmd, _) => bail!("unknown command or wrong arguments: '{cmd}'\n\n{USAGE}"),
    }
}

fn cmd_validate(props: &[&str], out: &mut dyn Write) -> Result<()> {
    let mut invalid = 0;
    for prop in props {
        match validate(prop) {
            Ok(()) => writeln!(out, "{prop}: ok")?,
            Err(reason) => {
                invalid += 1;
                writeln!(out, "{prop}: {reason}")?;
            },
        }
    }
    if invalid > 0 {
        bail!("{invalid} invalid property name(s)");
    }
    Ok(())
}

fn print_colors(scheme: &str, out: &mut dyn Write) -> Result<()> {
    let decoded = decode(scheme);
    for which in SchemeColor::ALL {
        writeln!(out, "{}: {}", which.key(), decoded.colors.get(which))?;
    }
    if !decoded.any_found {
        writeln!(out, "(no colors found)")?;
    }
    Ok(())
}

fn cmd_scheme(scheme: &str, out: &mut dyn Write) -> Result<()> {
    print_colors(scheme, out)
}

fn cmd_rc(path: &Path, out: &mut dyn Write) -> Result<()> {
    let scheme = extract_scheme_from_file(path)
        .with_context(|| format!("reading {}", path.display()))?;
    print_colors(&scheme, out)
}

fn load_store(ctx: &Invocation<'_>) -> Result<ChannelStore> {
    let path = &ctx.config.store_path;
    ChannelStore::load(path).with_context(|| format!("loading {}", path.display()))
}

fn save_store(ctx: &Invocation<'_>, store: &ChannelStore) -> Result<()> {
    let path = &ctx.config.store_path;
    store
        .save(path)
        .with_context(|| format!("saving {}", path.display()))?;
    ctx.debug
        .dbg(DebugDomains::YES, format_args!("Saved {}", path.display()));
    Ok(())
}

fn trace_channel(ctx: &Invocation<'_>, channel: &str, message: std::fmt::Arguments<'_>) {
    if channel == XSETTINGS_CHANNEL {
        ctx.debug.dbg_filtered(DebugDomains::XSETTINGS, message);
    }
}

fn cmd_get(ctx: &Invocation<'_>, channel: &str, property: &str, out: &mut dyn Write) -> Result<()> {
    let name = PropertyName::new(property)?;
    let store = load_store(ctx)?;
    let value = store
        .channel(channel)
        .and_then(|ch| ch.get(&name))
        .with_context(|| format!("property {property} does not exist on channel {channel}"))?;
    writeln!(out, "{value}")?;
    Ok(())
}

fn cmd_set(
    ctx: &Invocation<'_>,
    channel: &str,
    property: &str,
    ty: &str,
    text: &str,
    out: &mut dyn Write,
) -> Result<()> {
    let Some(ty) = ValueType::from_keyword(ty) else {
        bail!("unknown type '{ty}'");
    };
    let Some(value) = PropertyValue::parse(ty, text)? else {
        bail!("cannot set an empty value; use 'reset' instead");
    };

    let mut store = load_store(ctx)?;
    let ch = store.channel_mut(channel)?;

    let mut editor = match PropertyName::new(property) {
        Ok(name) if ch.has_property(&name) => PropertyEditor::edit_property(&*ch, &name),
        _ => {
            let mut editor = PropertyEditor::new_property();
            editor.set_name(property);
            editor
        },
    };
    if let NameStatus::Invalid(reason) = editor.name_status() {
        bail!("{property}: {reason}");
    }
    if !editor.set_value_type(ty) && editor.value_type() != ty {
        bail!(
            "{property} holds a value of type {}, not {ty}",
            editor.value_type()
        );
    }
    editor.set_value(&value);
    let stored = editor.build_value().unwrap_or(value);

    if let Some(name) = editor.commit(ch)? {
        trace_channel(ctx, channel, format_args!("{name} = {stored}"));
    }
    save_store(ctx, &store)?;
    writeln!(out, "{property} = {stored}")?;
    Ok(())
}

fn cmd_reset(ctx: &Invocation<'_>, channel: &str, property: &str, out: &mut dyn Write) -> Result<()> {
    let name = PropertyName::new(property)?;
    let mut store = load_store(ctx)?;
    let existed = store.channel_mut(channel)?.reset(&name)?;
    if existed {
        trace_channel(ctx, channel, format_args!("{name} reset"));
        save_store(ctx, &store)?;
        writeln!(out, "{property} reset")?;
    } else {
        writeln!(out, "{property} was not set")?;
    }
    Ok(())
}

fn cmd_list(ctx: &Invocation<'_>, channel: &str, out: &mut dyn Write) -> Result<()> {
    let store = load_store(ctx)?;
    let Some(ch) = store.channel(channel) else {
        bail!("channel {channel} does not exist");
    };
    for (name, value) in ch.iter() {
        writeln!(out, "{name}\t{}\t{value}", value.value_type())?;
    }
    Ok(())
}

fn cmd_appearance(ctx: &Invocation<'_>, out: &mut dyn Write) -> Result<()> {
    let mut store = load_store(ctx)?;
    let settings = AppearanceSettings::new(store.channel_mut(XSETTINGS_CHANNEL)?);
    let antialias = match settings.antialias() {
        Some(true) => "on",
        Some(false) => "off",
        None => "unset",
    };
    let dpi = settings.dpi_state(ScreenGeometry::default());
    writeln!(out, "theme: {}", settings.theme_name())?;
    writeln!(out, "icon theme: {}", settings.icon_theme_name())?;
    writeln!(out, "font: {}", settings.font_name())?;
    writeln!(out, "toolbar style: {}", settings.toolbar_style())?;
    writeln!(out, "antialias: {antialias}")?;
    writeln!(out, "hinting: {}", settings.hint_style())?;
    writeln!(out, "subpixel order: {}", settings.subpixel_order())?;
    if dpi.custom_enabled {
        writeln!(out, "dpi: {} (custom)", dpi.spin_value)?;
    } else {
        writeln!(out, "dpi: automatic")?;
    }
    Ok(())
}

fn cmd_dpi(ctx: &Invocation<'_>, args: [&&str; 4], out: &mut dyn Write) -> Result<()> {
    let mut values = [0u32; 4];
    for (slot, arg) in values.iter_mut().zip(args) {
        *slot = arg
            .parse()
            .with_context(|| format!("'{arg}' is not a valid size"))?;
    }
    let [width_px, height_px, width_mm, height_mm] = values;
    let screen = ScreenGeometry::new(width_px, height_px, width_mm, height_mm);
    let dpi = if width_mm == 0 || height_mm == 0 {
        ctx.config.fallback_dpi
    } else {
        compute_dpi(screen)
    };
    writeln!(out, "{dpi}")?;
    Ok(())
}

fn cmd_search(menu: &Path, text: &str, out: &mut dyn Write) -> Result<()> {
    let mut index =
        SettingsIndex::load(menu).with_context(|| format!("loading {}", menu.display()))?;
    index.set_filter(text);
    for category in index.visible() {
        writeln!(out, "{}", category.name)?;
        for item in &category.items {
            writeln!(out, "  {}\t{}", item.name, item.comment)?;
        }
    }
    match index.on_return() {
        ReturnAction::Activate(item) => writeln!(out, "Return launches: {}", item.command)?,
        ReturnAction::Focus(item) => writeln!(out, "Return focuses: {}", item.name)?,
        ReturnAction::Nothing => writeln!(out, "No matches")?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn config_in(dir: &Path) -> AppConfig {
        AppConfig {
            store_path: dir.join("channels.json"),
            ..AppConfig::default()
        }
    }

    fn exec(config: &AppConfig, args: &[&str]) -> (Result<()>, String) {
        let ctx = Invocation {
            config,
            debug: DebugDomains::empty(),
        };
        let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        let mut out = Vec::new();
        let result = run(&args, &ctx, &mut out);
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn validate_reports_each_name() {
        let config = AppConfig::default();
        let (r, out) = exec(&config, &["validate", "/Net/ThemeName", "/bad/"]);
        assert!(r.is_err());
        assert_eq!(
            out,
            "/Net/ThemeName: ok\n/bad/: Property names cannot end with a '/' character\n"
        );
        let (r, _) = exec(&config, &["validate", "/a"]);
        assert!(r.is_ok());
    }

    #[test]
    fn scheme_prints_all_slots() {
        let (r, out) = exec(&AppConfig::default(), &["scheme", "bg_color:#102030"]);
        r.unwrap();
        assert_eq!(
            out,
            "fg_color: #ffffff\nbg_color: #102030\nselected_bg_color: #ffffff\n"
        );
    }

    #[test]
    fn rc_file() {
        let dir = tempfile::tempdir().unwrap();
        let rc = dir.path().join("gtkrc");
        fs::write(&rc, "style \"x\" { fg[NORMAL] = \"#000000\" }").unwrap();
        let (r, out) = exec(&config_in(dir.path()), &["rc", rc.to_str().unwrap()]);
        r.unwrap();
        assert!(out.starts_with("fg_color: #000000\n"));

        let (r, _) = exec(&config_in(dir.path()), &["rc", "/nonexistent/gtkrc"]);
        assert!(r.is_err());
    }

    #[test]
    fn set_get_list_reset() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());

        exec(&config, &["set", "xsettings", "/Xft/DPI", "int", "120"]).0.unwrap();
        exec(&config, &["set", "xsettings", "/Net/ThemeName", "string", "Greybird"]).0.unwrap();

        let (r, out) = exec(&config, &["get", "xsettings", "/Xft/DPI"]);
        r.unwrap();
        assert_eq!(out, "120\n");

        let (r, out) = exec(&config, &["list", "xsettings"]);
        r.unwrap();
        assert_eq!(out, "/Net/ThemeName\tstring\tGreybird\n/Xft/DPI\tint\t120\n");

        let (r, out) = exec(&config, &["reset", "xsettings", "/Xft/DPI"]);
        r.unwrap();
        assert_eq!(out, "/Xft/DPI reset\n");
        assert!(exec(&config, &["get", "xsettings", "/Xft/DPI"]).0.is_err());
    }

    #[test]
    fn set_keeps_wide_integers_exact() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let (r, out) = exec(&config, &["set", "x", "/big", "int64", "9007199254740993"]);
        r.unwrap();
        assert_eq!(out, "/big = 9007199254740993\n");
        exec(&config, &["set", "x", "/huge", "uint64", "18446744073709551615"]).0.unwrap();
        assert_eq!(exec(&config, &["get", "x", "/big"]).1, "9007199254740993\n");
        assert_eq!(exec(&config, &["get", "x", "/huge"]).1, "18446744073709551615\n");

        // Editing an existing wide property goes through the same path.
        exec(&config, &["set", "x", "/big", "int64", "-9007199254740995"]).0.unwrap();
        assert_eq!(exec(&config, &["get", "x", "/big"]).1, "-9007199254740995\n");
    }

    #[test]
    fn set_refuses_type_change() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        exec(&config, &["set", "xfwm4", "/general/count", "int", "4"]).0.unwrap();
        let (r, _) = exec(&config, &["set", "xfwm4", "/general/count", "string", "four"]);
        assert!(r.is_err());
        exec(&config, &["set", "xfwm4", "/general/count", "int", "6"]).0.unwrap();
        assert_eq!(exec(&config, &["get", "xfwm4", "/general/count"]).1, "6\n");
    }

    #[test]
    fn set_rejects_bad_input() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        assert!(exec(&config, &["set", "x", "no-slash", "int", "1"]).0.is_err());
        assert!(exec(&config, &["set", "x", "/a", "complex", "1"]).0.is_err());
        assert!(exec(&config, &["set", "x", "/a", "int", "one"]).0.is_err());
        assert!(exec(&config, &["set", "x", "/a", "empty", ""]).0.is_err());
        assert!(!config.store_path.exists());
    }

    #[test]
    fn appearance_summary() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let (r, out) = exec(&config, &["appearance"]);
        r.unwrap();
        assert!(out.starts_with("theme: Default\nicon theme: Rodent\n"));
        assert!(out.ends_with("dpi: 96 (custom)\n"));

        exec(&config, &["set", "xsettings", "/Xft/DPI", "int", "-1"]).0.unwrap();
        let (_, out) = exec(&config, &["appearance"]);
        assert!(out.ends_with("dpi: automatic\n"));

        exec(&config, &["set", "xsettings", "/Xft/DPI", "int", "144"]).0.unwrap();
        exec(&config, &["set", "xsettings", "/Xft/HintStyle", "string", "hintfull"]).0.unwrap();
        let (_, out) = exec(&config, &["appearance"]);
        assert!(out.contains("hinting: hintfull\n"));
        assert!(out.ends_with("dpi: 144 (custom)\n"));
    }

    #[test]
    fn dpi_uses_configured_fallback() {
        let config = AppConfig {
            fallback_dpi: 110,
            ..AppConfig::default()
        };
        assert_eq!(exec(&config, &["dpi", "1920", "1080", "0", "0"]).1, "110\n");
        assert_eq!(exec(&config, &["dpi", "1920", "1080", "508", "286"]).1, "95\n");
        assert!(exec(&config, &["dpi", "a", "b", "c", "d"]).0.is_err());
    }

    #[test]
    fn search_menu() {
        let dir = tempfile::tempdir().unwrap();
        let menu = dir.path().join("menu.toml");
        fs::write(
            &menu,
            r#"
[[category]]
name = "Personal"

[[category.item]]
name = "Appearance"
comment = "Themes and fonts"
command = "blade-appearance-settings"

[[category.item]]
name = "Panel"
comment = "Panel layout"
command = "blade-panel-settings"
"#,
        )
        .unwrap();
        let config = config_in(dir.path());
        let (r, out) = exec(&config, &["search", menu.to_str().unwrap(), "fonts"]);
        r.unwrap();
        assert_eq!(
            out,
            "Personal\n  Appearance\tThemes and fonts\nReturn launches: blade-appearance-settings\n"
        );
        let (_, out) = exec(&config, &["search", menu.to_str().unwrap()]);
        assert!(out.ends_with("Return focuses: Appearance\n"));
    }

    #[test]
    fn unknown_command_fails() {
        let config = AppConfig::default();
        assert!(exec(&config, &["frobnicate"]).0.is_err());
        assert!(exec(&config, &[]).0.is_err());
        assert!(exec(&config, &["get", "only-one-arg"]).0.is_err());
    }
}
