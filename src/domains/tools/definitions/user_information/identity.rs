use std::time::Duration;

use tracing::debug;

use crate::domains::tools::definitions::common::run_command;

/// Who is running the process, as far as the OS knows.
pub trait Identity {
    fn username(&self) -> Option<String>;
    fn full_name(&self) -> Option<String>;
}

/// Identity from the environment, the passwd database and `id`/`getent`.
#[derive(Debug, Clone)]
pub struct SystemIdentity {
    command_timeout: Duration,
}

impl SystemIdentity {
    pub fn new(command_timeout: Duration) -> Self {
        Self { command_timeout }
    }
}

impl Identity for SystemIdentity {
    fn username(&self) -> Option<String> {
        ["USER", "LOGNAME"]
            .iter()
            .filter_map(|key| std::env::var(key).ok())
            .map(|user| user.trim().to_string())
            .find(|user| !user.is_empty())
            .or_else(|| run_command("id", &["-un"], self.command_timeout))
    }

    /// GECOS from `/etc/passwd`, then `getent passwd`, then the username.
    fn full_name(&self) -> Option<String> {
        let user = self.username()?;

        if let Some(name) = std::fs::read_to_string("/etc/passwd")
            .ok()
            .and_then(|passwd| gecos_from_passwd(&passwd, &user))
        {
            return Some(name);
        }

        if let Some(name) = run_command("getent", &["passwd", &user], self.command_timeout)
            .and_then(|entry| gecos_from_passwd(&entry, &user))
        {
            return Some(name);
        }

        debug!("No full name on record for {}", user);
        Some(user)
    }
}

/// First GECOS sub-field of `user` in passwd-formatted text.
pub fn gecos_from_passwd(passwd: &str, user: &str) -> Option<String> {
    passwd
        .lines()
        .map(|line| line.split(':').collect::<Vec<_>>())
        .find(|fields| fields.len() >= 5 && fields[0] == user)
        .and_then(|fields| {
            let name = fields[4].split(',').next().unwrap_or("").trim();
            (!name.is_empty()).then(|| name.to_string())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PASSWD: &str = "\
root:x:0:0:root:/root:/bin/bash
jane:x:1000:1000:Jane Doe,,,:/home/jane:/bin/zsh
svc:x:999:999::/var/lib/svc:/usr/sbin/nologin
";

    #[test]
    fn test_gecos_from_passwd() {
        assert_eq!(gecos_from_passwd(PASSWD, "jane").as_deref(), Some("Jane Doe"));
        assert_eq!(gecos_from_passwd(PASSWD, "root").as_deref(), Some("root"));
        assert_eq!(gecos_from_passwd(PASSWD, "svc"), None);
        assert_eq!(gecos_from_passwd(PASSWD, "nobody"), None);
    }

    #[test]
    fn test_system_full_name_never_blank() {
        let identity = SystemIdentity::new(Duration::from_secs(5));
        if let Some(name) = identity.full_name() {
            assert!(!name.trim().is_empty());
        }
    }
}
