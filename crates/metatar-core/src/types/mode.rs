//! `ls -l` style permission strings.

const S_ISUID: u32 = 0o4000;
const S_ISGID: u32 = 0o2000;
const S_ISVTX: u32 = 0o1000;

/// Renders a type character and permission bits as a 10-character string
/// such as `-rw-r--r--` or `drwxr-sr-t`.
///
/// Setuid, setgid and sticky bits replace the matching execute position with
/// `s`/`S` or `t`/`T`, lowercase when the execute bit is also set.
///
/// # Examples
///
/// ```
/// use metatar_core::types::mode_string;
///
/// assert_eq!(mode_string('-', 0o644), "-rw-r--r--");
/// assert_eq!(mode_string('d', 0o1777), "drwxrwxrwt");
/// assert_eq!(mode_string('-', 0o4644), "-rwSr--r--");
/// ```
#[must_use]
pub fn mode_string(type_char: char, mode: u32) -> String {
    let mut out = String::with_capacity(10);
    out.push(type_char);

    let triplets = [
        (0o400, 0o200, 0o100, S_ISUID, 's', 'S'),
        (0o040, 0o020, 0o010, S_ISGID, 's', 'S'),
        (0o004, 0o002, 0o001, S_ISVTX, 't', 'T'),
    ];

    for (read, write, exec, special, with_exec, without_exec) in triplets {
        out.push(if mode & read != 0 { 'r' } else { '-' });
        out.push(if mode & write != 0 { 'w' } else { '-' });
        out.push(match (mode & exec != 0, mode & special != 0) {
            (true, true) => with_exec,
            (false, true) => without_exec,
            (true, false) => 'x',
            (false, false) => '-',
        });
    }

    out
}
