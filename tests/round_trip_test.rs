use std::fs;

use anyhow::Result;
use netrc_keeper::{FileOps, Netrc, Platform, WriteOptions};
use netrc_test_utils::NetrcGuard;

const MESSY: &str = "\
# personal credentials
\tmachine   alpha.example.com # trailing note
  login\talice
  password   s3cret

machine beta.example.com login bob password hunter2 macdef init
cd /pub

# keep this comment
machine default
  login anonymous
  password guest
";

fn open(guard: &NetrcGuard) -> Result<Netrc> {
  Ok(Netrc::read(guard.netrc_path())?.with_file_ops(FileOps::new(Platform::portable())))
}

#[test]
fn unedited_file_saves_byte_identical() -> Result<()> {
  let guard = NetrcGuard::new(MESSY);
  let netrc = open(&guard)?;

  assert_eq!(netrc.count(), 3);
  assert_eq!(netrc.serialize(), MESSY);

  netrc.save()?;
  assert_eq!(guard.content(), MESSY);
  Ok(())
}

#[test]
fn editing_one_entry_touches_only_its_values() -> Result<()> {
  let guard = NetrcGuard::new(MESSY);
  let mut netrc = open(&guard)?;
  netrc.set("beta.example.com", "robert", "correct-horse")?;
  netrc.save()?;

  assert_eq!(
    guard.content(),
    MESSY.replace("login bob password hunter2", "login robert password correct-horse")
  );
  Ok(())
}

#[test]
fn reread_after_set_new_sees_the_entry() -> Result<()> {
  let guard = NetrcGuard::new(MESSY);
  let mut netrc = open(&guard)?;
  netrc.set_new_item_prefix("\n# added\n");
  netrc.set("gamma.example.com", "carol", "pw")?;
  netrc.save()?;

  let reread = open(&guard)?;
  assert_eq!(reread.count(), 4);
  assert_eq!(
    reread.machines().collect::<Vec<_>>(),
    ["alpha.example.com", "beta.example.com", "default", "gamma.example.com"]
  );
  let entry = reread.get("gamma.example.com");
  assert_eq!(entry.login.as_deref(), Some("carol"));
  assert_eq!(entry.password.as_deref(), Some("pw"));
  assert!(guard.content().starts_with(MESSY));
  Ok(())
}

#[test]
fn unknown_machine_uses_default_entry() -> Result<()> {
  let guard = NetrcGuard::new(MESSY);
  let netrc = open(&guard)?;

  let (login, password) = netrc.get("unknown.example.com").into_pair();
  assert_eq!((login.as_str(), password.as_str()), ("anonymous", "guest"));
  Ok(())
}

#[test]
fn repeated_saves_keep_every_backup() -> Result<()> {
  let guard = NetrcGuard::new(MESSY);
  let mut netrc = open(&guard)?;

  netrc.set("alpha.example.com", "a1", "p1")?;
  netrc.save()?;
  netrc.set("alpha.example.com", "a2", "p2")?;
  netrc.save()?;

  let home = guard.home_dir();
  assert_eq!(fs::read_to_string(home.join(".netrc.000"))?, MESSY);
  assert!(fs::read_to_string(home.join(".netrc.001"))?.contains("login\ta1"));
  assert!(guard.content().contains("login\ta2"));
  Ok(())
}

#[test]
fn save_without_backup() -> Result<()> {
  let guard = NetrcGuard::new(MESSY);
  let mut netrc = open(&guard)?.with_write_options(WriteOptions {
    backup: false,
    ..WriteOptions::default()
  });
  netrc.set("alpha.example.com", "x", "y")?;
  netrc.save()?;

  assert!(!guard.home_dir().join(".netrc.000").exists());
  Ok(())
}
