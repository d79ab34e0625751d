use dirs_next as dirs;
use std::{ffi::OsString, path::PathBuf};

/// Expands a leading `~` to the user's home directory.
pub fn expand_local(path: &str) -> PathBuf {
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    } else if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// A destination with a colon names a remote host (`host:path`,
/// `user@host:path`, `rsync://…`) and is handed to the sync program as is.
pub fn expand_destination(destination: &str) -> OsString {
    if destination.contains(':') {
        OsString::from(destination)
    } else {
        expand_local(destination).into_os_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_expand_home_prefix() {
        let home = dirs::home_dir().unwrap();

        assert_eq!(expand_local("~/Documents"), home.join("Documents"));
        assert_eq!(expand_local("~"), home);
    }

    #[test]
    fn should_leave_other_paths_alone() {
        assert_eq!(expand_local("/srv/data/"), PathBuf::from("/srv/data/"));
        assert_eq!(expand_local("relative/dir"), PathBuf::from("relative/dir"));
        assert_eq!(expand_local("~other/dir"), PathBuf::from("~other/dir"));
    }

    #[test]
    fn should_pass_remote_destinations_through() {
        assert_eq!(
            expand_destination("user@nas:~/backup"),
            OsString::from("user@nas:~/backup")
        );
        assert_eq!(
            expand_destination("rsync://nas/module"),
            OsString::from("rsync://nas/module")
        );
    }

    #[test]
    fn should_expand_local_destinations() {
        let home = dirs::home_dir().unwrap();

        assert_eq!(
            expand_destination("~/backup"),
            home.join("backup").into_os_string()
        );
    }
}
