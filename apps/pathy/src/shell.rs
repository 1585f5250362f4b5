//! Shell-facing text: the activation wrapper and `export` lines.

use crate::pathlist::{CleanPathList, LIST_SEPARATOR};
use crate::side_channel::SIDE_CHANNEL_FD;
use shell_escape::unix::escape;
use std::borrow::Cow;

/// `export VAR=value` for a clean list, quoted for `eval` when needed.
pub fn export_line(var: &str, list: &CleanPathList) -> String {
    let value = list.serialize(LIST_SEPARATOR);
    format!("export {}={}", var, escape(Cow::Owned(value)))
}

/// Bash wrapper function plus completion hook for `bin`.
pub fn activation_script(bin: &str) -> String {
    let fd = SIDE_CHANNEL_FD;
    let mut s = String::new();
    s.push_str(&format!("_pathy_bin={}\n", escape(Cow::Borrowed(bin))));
    s.push('\n');
    s.push_str("pathy() {\n");
    s.push_str("    local _pathy_out\n");
    s.push_str("    exec 4>&1\n");
    s.push_str(&format!(
        "    _pathy_out=$(\"$_pathy_bin\" \"$@\" {}>&1 >&4) || return\n",
        fd
    ));
    s.push_str("    eval \"$_pathy_out\"\n");
    s.push_str("}\n");
    s.push('\n');
    s.push_str("_pathy_complete() {\n");
    s.push_str("    local IFS=$'\\n'\n");
    s.push_str(
        "    COMPREPLY=($(\"$_pathy_bin\" complete \"$COMP_CWORD\" \"${COMP_WORDS[@]}\"))\n",
    );
    s.push_str("}\n");
    s.push_str("complete -o nospace -F _pathy_complete pathy\n");
    s
}
