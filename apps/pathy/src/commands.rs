//! Command handlers.
//!
//! Read-only handlers print to `out`. Mutating handlers check the side
//! channel before doing anything else, compute a new list, clean it and
//! publish a single `export` line.

use crate::complete;
use crate::diagnostics;
use crate::dispatch::{Context, PROGNAME};
use crate::error::{PathyError, Result};
use crate::lint::run_doctor;
use crate::output::{self, LsRow};
use crate::pathlist::{CleanPathList, RawPathList};
use crate::scan;
use crate::shell;
use crate::utils::{confirm, KeyMatcher};
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::process::{Command, Stdio};

fn publish(ctx: &Context, list: &CleanPathList) -> Result<()> {
    ctx.channel
        .publish(|| shell::export_line(ctx.var(), list))
        .map_err(PathyError::from)
}

pub fn ls(ctx: &Context, keys: &[String], out: &mut dyn Write) -> Result<i32> {
    let matcher = KeyMatcher::new(keys)?;
    let rows: Vec<LsRow> = ctx
        .raw_list()
        .entries()
        .iter()
        .filter(|e| matcher.matches(e))
        .map(|e| LsRow {
            entry: e.clone(),
            exists: !e.is_empty() && Path::new(e).exists(),
        })
        .collect();
    output::print_ls(&rows, ctx.settings.output, ctx.settings.color, out)?;
    Ok(0)
}

pub fn ls_names(ctx: &Context, keys: &[String], out: &mut dyn Write) -> Result<i32> {
    let matcher = KeyMatcher::new(keys)?;
    let names: Vec<String> = scan::list_names(ctx.raw_list().clean().entries())
        .into_iter()
        .filter(|n| matcher.matches(n))
        .collect();
    output::print_lines(&names, out)?;
    Ok(0)
}

pub fn ls_files(ctx: &Context, keys: &[String], out: &mut dyn Write) -> Result<i32> {
    let matcher = KeyMatcher::new(keys)?;
    let files: Vec<String> = scan::list_files(ctx.raw_list().clean().entries())
        .into_iter()
        .filter(|f| matcher.matches(f))
        .collect();
    output::print_lines(&files, out)?;
    Ok(0)
}

/// Spawn `program` and stream every file in the path to its stdin.
pub fn run_files(ctx: &Context, program: &[String]) -> Result<i32> {
    let Some((name, args)) = program.split_first() else {
        return help(ctx, &mut io::stdout());
    };
    let files = scan::list_files(ctx.raw_list().clean().entries());
    tracing::debug!(program = %name, files = files.len(), "starting program");
    let mut child = Command::new(name)
        .args(args)
        .stdin(Stdio::piped())
        .spawn()
        .map_err(|source| PathyError::Spawn {
            program: name.clone(),
            source,
        })?;
    if let Some(mut stdin) = child.stdin.take() {
        for f in &files {
            if let Err(e) = writeln!(stdin, "{}", f) {
                // the program stopped reading; its exit status decides
                if e.kind() == io::ErrorKind::BrokenPipe {
                    break;
                }
                return Err(e.into());
            }
        }
    }
    let status = child.wait()?;
    if !status.success() {
        return Err(PathyError::ProgramFailed {
            program: name.clone(),
            status,
        });
    }
    Ok(0)
}

pub fn put_first(ctx: &Context, dirs: &[String]) -> Result<i32> {
    ctx.channel.check()?;
    publish(ctx, &ctx.raw_list_exact()?.with_front(dirs).clean())?;
    Ok(0)
}

pub fn put_last(ctx: &Context, dirs: &[String]) -> Result<i32> {
    ctx.channel.check()?;
    publish(ctx, &ctx.raw_list_exact()?.with_back(dirs).clean())?;
    Ok(0)
}

/// Entries of `list` to keep after asking about each one `keys` match.
pub fn select_survivors<F>(
    list: &CleanPathList,
    matcher: &KeyMatcher,
    mut remove: F,
) -> io::Result<Vec<String>>
where
    F: FnMut(&str) -> io::Result<bool>,
{
    let mut keep = Vec::with_capacity(list.len());
    for dir in list.entries() {
        if matcher.matches(dir) && remove(dir)? {
            continue;
        }
        keep.push(dir.clone());
    }
    Ok(keep)
}

pub fn rm(
    ctx: &Context,
    keys: &[String],
    input: &mut dyn BufRead,
    out: &mut dyn Write,
) -> Result<i32> {
    ctx.channel.check()?;
    let matcher = KeyMatcher::new(keys)?;
    let clean = ctx.raw_list_exact()?.clean();
    if clean.is_empty() {
        eprintln!("Path is empty");
        return Ok(0);
    }
    writeln!(out, "Going through the path list in order. Answer 'y' (yes)")?;
    writeln!(out, "to the entries you want to remove. Default answer is no.")?;
    let keep = select_survivors(&clean, &matcher, |dir| {
        confirm(&format!("Remove {}", dir), &mut *input, &mut *out)
    })?;
    publish(ctx, &RawPathList::from_entries(keep).clean())?;
    Ok(0)
}

pub fn which(ctx: &Context, names: &[String], out: &mut dyn Write) -> Result<i32> {
    let clean = ctx.raw_list().clean();
    for name in names {
        if let Some(hit) = scan::which(clean.entries(), name) {
            writeln!(out, "{}", hit)?;
        }
    }
    Ok(0)
}

pub fn shadow(ctx: &Context, keys: &[String], out: &mut dyn Write) -> Result<i32> {
    let matcher = KeyMatcher::new(keys)?;
    let map = scan::shadowed(ctx.raw_list().clean().entries(), |n| matcher.matches(n));
    output::print_shadow(&map, ctx.settings.output, ctx.settings.color, out)?;
    Ok(0)
}

/// Lint the raw list; with `fix`, publish the cleaned fixed list.
pub fn doctor(ctx: &Context, fix: bool, check_dirs: bool, out: &mut dyn Write) -> Result<i32> {
    let raw = if fix {
        ctx.channel.check()?;
        ctx.raw_list_exact()?
    } else {
        ctx.raw_list()
    };
    let mut report = run_doctor(&raw);
    if check_dirs {
        diagnostics::check_dirs(&mut report);
    }
    output::print_doctor(&report, ctx.settings.output, ctx.settings.color, out)?;
    if fix {
        publish(ctx, &report.fixed.clean())?;
    }
    Ok(0)
}

/// Edit the raw entries one per line in an editor and publish the result.
pub fn edit(ctx: &Context, editor: &[String]) -> Result<i32> {
    ctx.channel.check()?;
    let raw = ctx.raw_list_exact()?;
    let (program, args) = match editor.split_first() {
        Some((p, a)) => (p.clone(), a.to_vec()),
        None => match std::env::var("EDITOR") {
            Ok(e) if !e.trim().is_empty() => (e, Vec::new()),
            _ => return Err(PathyError::EditorNotSet),
        },
    };
    let mut tmp = tempfile::Builder::new()
        .prefix(PROGNAME)
        .suffix(".txt")
        .tempfile()
        .map_err(PathyError::TempFile)?;
    for entry in raw.entries() {
        writeln!(tmp, "{}", entry)?;
    }
    tmp.flush()?;

    tracing::debug!(editor = %program, file = %tmp.path().display(), "starting editor");
    let status = Command::new(&program)
        .args(&args)
        .arg(tmp.path())
        .status()
        .map_err(|source| PathyError::Spawn {
            program: program.clone(),
            source,
        })?;
    if !status.success() {
        return Err(PathyError::ProgramFailed { program, status });
    }
    let edited = fs::read_to_string(tmp.path())?;
    publish(ctx, &parse_edited(&edited).clean())?;
    Ok(0)
}

/// Entries from an edited file: one per line, blank lines dropped.
pub fn parse_edited(text: &str) -> RawPathList {
    RawPathList::from_entries(
        text.lines()
            .map(|l| l.trim_end_matches('\r'))
            .filter(|l| !l.trim().is_empty()),
    )
}

pub fn export(ctx: &Context, out: &mut dyn Write) -> Result<i32> {
    let clean = ctx.raw_list_exact()?.clean();
    writeln!(out, "{}", shell::export_line(ctx.var(), &clean))?;
    Ok(0)
}

pub fn activate(out: &mut dyn Write) -> Result<i32> {
    let bin = std::env::current_exe()?;
    let bin = fs::canonicalize(&bin).unwrap_or(bin);
    write!(out, "{}", shell::activation_script(&bin.to_string_lossy()))?;
    Ok(0)
}

pub fn version(out: &mut dyn Write) -> Result<i32> {
    writeln!(
        out,
        "{} {} ({}, {})",
        PROGNAME,
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH
    )?;
    Ok(0)
}

pub fn help(ctx: &Context, out: &mut dyn Write) -> Result<i32> {
    write!(out, "{}", ctx.registry.help_text())?;
    Ok(1)
}

/// Print completion candidates; a bad index exits 1 without output.
pub fn complete(ctx: &Context, cword: &str, words: &[String], out: &mut dyn Write) -> Result<i32> {
    let Some(cword) = complete::parse_cword(cword, words) else {
        return Ok(1);
    };
    let default_var = ctx.var().to_string();
    let lookup = |var: &str| {
        if var == default_var {
            ctx.value.to_string_lossy().to_string()
        } else {
            std::env::var_os(var)
                .map(|v| v.to_string_lossy().to_string())
                .unwrap_or_default()
        }
    };
    let found = complete::candidates(&ctx.registry, &default_var, cword, words, lookup);
    output::print_lines(&found, out)?;
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Effective, OutputMode};
    use crate::dispatch::Registry;
    use crate::models::known;
    use crate::side_channel::{ChannelError, SideChannel};
    use std::ffi::OsString;
    use std::io::Cursor;
    use tempfile::tempdir;

    fn ctx_with(value: impl Into<OsString>, channel: SideChannel) -> Context {
        let settings = Effective {
            var: "PATH".into(),
            output: OutputMode::Human,
            color: false,
            check_dirs: false,
            known: known::builtin(),
            config_file: None,
        };
        Context::new(settings, Registry::new(known::builtin()), value, channel)
    }

    fn no_channel() -> SideChannel {
        SideChannel::with_fd(i32::MAX)
    }

    /// Pipe-backed channel plus its read end.
    #[cfg(unix)]
    fn pipe_channel() -> (std::fs::File, std::os::fd::OwnedFd, SideChannel) {
        use std::os::fd::AsRawFd;
        let (rd, wr) = nix::unistd::pipe().unwrap();
        let ch = SideChannel::with_fd(wr.as_raw_fd());
        (std::fs::File::from(rd), wr, ch)
    }

    #[cfg(unix)]
    fn drain(mut rd: std::fs::File, wr: std::os::fd::OwnedFd) -> String {
        use std::io::Read;
        drop(wr);
        let mut got = String::new();
        rd.read_to_string(&mut got).unwrap();
        got
    }

    fn run<F>(f: F) -> (i32, String)
    where
        F: FnOnce(&mut Vec<u8>) -> Result<i32>,
    {
        let mut buf = Vec::new();
        let code = f(&mut buf).unwrap();
        (code, String::from_utf8(buf).unwrap())
    }

    #[test]
    fn test_ls_keeps_raw_order_and_filters() {
        let ctx = ctx_with("/usr/bin::/usr/bin:/opt/Local/bin", no_channel());
        let (code, text) = run(|o| ls(&ctx, &[], o));
        assert_eq!(code, 0);
        assert_eq!(text, "/usr/bin\n\n/usr/bin\n/opt/Local/bin\n");
        let (_, text) = run(|o| ls(&ctx, &["local".into()], o));
        assert_eq!(text, "/opt/Local/bin\n");
    }

    #[test]
    fn test_export_prints_clean_list() {
        let ctx = ctx_with(&["/a/", "", "/b", "/a"].join(":"), no_channel());
        let (_, text) = run(|o| export(&ctx, o));
        assert_eq!(text, "export PATH='/a:/b'\n");
    }

    #[test]
    fn test_mutating_commands_fail_without_channel() {
        let ctx = ctx_with("/a:/b", no_channel());
        let dirs = vec!["/c".to_string()];
        for res in [
            put_first(&ctx, &dirs),
            put_last(&ctx, &dirs),
            edit(&ctx, &["true".to_string()]),
        ] {
            assert!(matches!(
                res,
                Err(PathyError::Channel(ChannelError::Unavailable(_)))
            ));
        }
    }

    #[test]
    fn test_rm_checks_channel_before_prompting() {
        let ctx = ctx_with("/a:/b", no_channel());
        let mut input = Cursor::new(b"y\ny\n".to_vec());
        let mut out = Vec::new();
        assert!(rm(&ctx, &[], &mut input, &mut out).is_err());
        assert!(out.is_empty());
        assert_eq!(input.position(), 0);
    }

    #[test]
    fn test_doctor_fix_requires_channel_but_report_does_not() {
        let ctx = ctx_with(":/usr/bin", no_channel());
        let mut out = Vec::new();
        assert!(doctor(&ctx, true, false, &mut out).is_err());
        assert!(out.is_empty());
        let (code, text) = run(|o| doctor(&ctx, false, false, o));
        assert_eq!(code, 0);
        assert!(text.ends_with("1 problem found\n"));
    }

    #[test]
    fn test_select_survivors_only_asks_matching() {
        let list = RawPathList::from_entries(["/usr/bin", "/opt/bin", "/bin"]).clean();
        let matcher = KeyMatcher::new(&["usr|opt".into()]).unwrap();
        let mut asked = Vec::new();
        let keep = select_survivors(&list, &matcher, |d| {
            asked.push(d.to_string());
            Ok(d == "/opt/bin")
        })
        .unwrap();
        assert_eq!(asked, ["/usr/bin", "/opt/bin"]);
        assert_eq!(keep, ["/usr/bin", "/bin"]);
    }

    #[test]
    fn test_parse_edited_drops_blank_lines() {
        let raw = parse_edited("/a\r\n\n  \n/b\n");
        assert_eq!(raw.entries(), ["/a", "/b"]);
    }

    #[test]
    fn test_help_exits_one() {
        let ctx = ctx_with("", no_channel());
        let (code, text) = run(|o| help(&ctx, o));
        assert_eq!(code, 1);
        assert!(text.contains("pathy doctor"));
    }

    #[test]
    fn test_complete_bad_index_is_silent() {
        let ctx = ctx_with("", no_channel());
        let (code, text) = run(|o| complete(&ctx, "nope", &["pathy".into()], o));
        assert_eq!(code, 1);
        assert!(text.is_empty());
    }

    #[test]
    fn test_which_prints_first_hit() {
        let tmp = tempdir().unwrap();
        let a = tmp.path().join("a");
        let b = tmp.path().join("b");
        fs::create_dir_all(&a).unwrap();
        fs::create_dir_all(&b).unwrap();
        fs::write(b.join("tool"), b"").unwrap();
        fs::write(a.join("tool"), b"").unwrap();
        let value = format!("{}:{}", b.display(), a.display());
        let ctx = ctx_with(&value, no_channel());
        let (_, text) = run(|o| which(&ctx, &["tool".into(), "absent".into()], o));
        assert_eq!(text, format!("{}\n", b.join("tool").display()));
    }

    #[cfg(unix)]
    #[test]
    fn test_rm_on_empty_list_publishes_nothing() {
        let (rd, wr, ch) = pipe_channel();
        let ctx = ctx_with("", ch);
        let mut input = Cursor::new(Vec::new());
        let mut out = Vec::new();
        assert_eq!(rm(&ctx, &[], &mut input, &mut out).unwrap(), 0);
        assert!(out.is_empty());
        drop(ctx);
        assert_eq!(drain(rd, wr), "");
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_value_is_refused_before_publishing() {
        use std::os::unix::ffi::OsStringExt;
        let value = OsString::from_vec(b"/opt/caf\xe9/bin:/usr/bin".to_vec());
        let (rd, wr, ch) = pipe_channel();
        let ctx = ctx_with(value, ch);
        let dirs = vec!["/c".to_string()];
        for res in [
            put_first(&ctx, &dirs),
            put_last(&ctx, &dirs),
            doctor(&ctx, true, false, &mut Vec::new()),
            export(&ctx, &mut Vec::new()),
        ] {
            assert!(matches!(res, Err(PathyError::NotUnicode { ref var }) if var == "PATH"));
        }
        // read-only commands still list the entries
        let (code, text) = run(|o| ls(&ctx, &[], o));
        assert_eq!(code, 0);
        assert!(text.ends_with("/usr/bin\n"));
        drop(ctx);
        assert_eq!(drain(rd, wr), "");
    }
}
