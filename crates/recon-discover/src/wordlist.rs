//! Subdomain wordlists.

use std::path::Path;

use crate::error::Result;

/// Built-in labels tried when no wordlist file is given.
pub const DEFAULT_WORDLIST: &[&str] = &[
    "www", "mail", "ftp", "localhost", "webmail", "smtp", "pop", "ns1", "webdisk",
    "ns2", "cpanel", "whm", "autodiscover", "autoconfig", "m", "imap", "test",
    "ns", "blog", "pop3", "dev", "www2", "admin", "forum", "news", "vpn", "ns3",
    "mail2", "new", "mysql", "old", "lists", "support", "mobile", "mx", "static",
    "docs", "beta", "shop", "sql", "secure", "demo", "cp", "calendar", "wiki",
    "web", "media", "email", "images", "img", "www1", "intranet", "portal", "video",
    "sip", "dns2", "api", "cdn", "stats", "dns1", "ns4", "www3", "dns", "search",
    "staging", "server", "mx1", "chat", "wap", "my", "svn", "mail1", "sites", "proxy",
    "ads", "host", "crm", "cms", "backup", "mx2", "lyncdiscover", "info", "apps", "download",
    "remote", "db", "forums", "store", "relay", "files", "newsletter", "app", "live",
    "owa", "en", "start", "sms", "office", "exchange", "ipv4", "mail3", "help", "blogs",
    "helpdesk", "web1", "home", "library", "ftp2", "ntp", "monitor", "login", "service",
    "correo", "www4", "moodle", "it", "gateway", "gw", "i", "stat", "stage", "ldap",
    "tv", "ssl", "web2", "ns5", "upload", "nagios", "smtp2", "online", "ad", "survey",
    "data", "radio", "extranet", "test2", "mssql", "dns3", "jobs", "services", "panel",
    "irc", "hosting", "cloud", "de", "gmail", "s", "bbs", "cs", "ww", "mrtg", "git",
    "image", "members", "poczta", "s1", "meet", "preview", "fr", "cloudflare", "dev2",
    "photo", "jabber", "legacy", "go", "es", "ssh", "redmine", "partner", "vps", "server1",
    "sv", "ns6", "webmail2", "av", "community", "cacti", "time", "sftp", "lib", "facebook",
    "www5", "smtp1", "feeds", "w", "games", "ts", "alumni", "dl", "s2", "phpmyadmin",
    "archive", "cn", "tools", "stream", "projects", "elearning", "im", "iphone", "control",
    "voip", "test1", "ws", "rss", "sp", "wwww", "vpn2", "jira", "list", "connect",
    "gallery", "billing", "mailer", "update", "pda", "game", "ns0", "testing", "sandbox",
    "job", "events", "dialin", "ml", "fb", "videos", "music", "a", "partners", "mailhost",
    "downloads", "reports", "ca", "router", "speedtest", "local", "training", "edu", "bugs",
    "manage", "s3", "status", "host2", "ww2", "marketing", "conference", "content", "network",
    "firewall", "repository", "ftp1", "design", "mirror", "sms2", "plus", "customers",
    "smtp3", "devel", "password", "us", "mambo", "url", "vpn1", "master", "mail4", "www6",
    "site", "tracker", "webdav", "docs2", "ts2", "ns7", "ns8", "collab", "gateway2", "proxy2",
    "ps", "sip2", "smtp4", "www7", "corp", "internal", "mailgate", "pay", "access", "jenkins",
    "docker", "gitlab", "sonar", "nexus", "grafana", "prometheus", "kubernetes", "rancher",
];

pub fn default_wordlist() -> Vec<String> {
    DEFAULT_WORDLIST.iter().map(|s| s.to_string()).collect()
}

/// Read one label per line. Blank lines and `#` comments are skipped; the
/// labels themselves are taken as-is.
pub fn parse_wordlist(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(String::from)
        .collect()
}

pub fn load_wordlist(path: &Path) -> Result<Vec<String>> {
    let contents = std::fs::read_to_string(path)?;
    let labels = parse_wordlist(&contents);
    tracing::info!(path = %path.display(), labels = labels.len(), "Loaded wordlist");
    Ok(labels)
}
