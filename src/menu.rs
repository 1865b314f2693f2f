//! Interactive terminal front end
//! Numbered menu over the same actions the HTTP routes expose

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use crate::app::DomainManager;
use crate::notice::NoticeBoard;

fn print_menu<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "\n========================================")?;
    writeln!(out, "1. Connect wallet")?;
    writeln!(out, "2. Switch network")?;
    writeln!(out, "3. Refresh domains")?;
    writeln!(out, "4. Set domain name")?;
    writeln!(out, "5. Set record")?;
    writeln!(out, "6. Edit a listed domain")?;
    writeln!(out, "7. Submit (mint / update)")?;
    writeln!(out, "8. Exit")?;
    writeln!(out, "========================================")?;
    write!(out, "Choose an option: ")?;
    out.flush()
}

/// Prompt and read one trimmed line; `None` at end of input
fn read_input<R: BufRead, W: Write>(input: &mut R, out: &mut W, prompt: &str) -> io::Result<Option<String>> {
    write!(out, "{}", prompt)?;
    out.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn print_notices<W: Write>(out: &mut W, notices: &NoticeBoard) -> io::Result<()> {
    for notice in notices.drain() {
        writeln!(out, "\n⚠️  {}", notice)?;
    }
    Ok(())
}

/// Run the menu until the user exits or input ends
pub async fn run<R: BufRead, W: Write>(
    manager: Arc<DomainManager>,
    notices: Arc<NoticeBoard>,
    mut input: R,
    mut out: W,
) -> io::Result<()> {
    loop {
        writeln!(out, "\n{}", manager.view())?;
        print_menu(&mut out)?;

        let Some(choice) = read_input(&mut input, &mut out, "")? else {
            break;
        };

        match choice.as_str() {
            "1" => manager.connect().await,
            "2" => manager.switch_network().await,
            "3" => {
                if manager.is_on_required_network() {
                    manager.fetch_mints().await;
                } else {
                    writeln!(out, "\n❌ Switch to {} first.", manager.config().required_chain)?;
                }
            }
            "4" => {
                let Some(domain) = read_input(&mut input, &mut out, "Domain name (min 3 characters): ")? else {
                    break;
                };
                manager.set_domain(domain);
            }
            "5" => {
                let Some(record) = read_input(&mut input, &mut out, "Record (optional): ")? else {
                    break;
                };
                manager.set_record(record);
            }
            "6" => {
                let Some(id) = read_input(&mut input, &mut out, "Domain # to edit: ")? else {
                    break;
                };
                match id.parse::<usize>() {
                    Ok(id) if manager.edit(id) => {}
                    _ => writeln!(out, "\n❌ No listed domain #{}", id)?,
                }
            }
            "7" => manager.submit().await,
            "8" => {
                writeln!(out, "\n👋 Goodbye!")?;
                break;
            }
            _ => writeln!(out, "\n❌ Invalid option. Please choose 1-8.")?,
        }

        print_notices(&mut out, &notices)?;
    }

    Ok(())
}
