//! Numbered-menu command loop.
//!
//! The console is generic over its input and output so the binary can run it
//! on stdin/stdout while tests drive it with in-memory buffers.

mod commands;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, Lines};
use tracing::{info, warn};

use crate::error::AppError;
use crate::state::AppState;

const MAIN_MENU: &str = "\n=== Restaurant Order Management System ===\n\
1. Display Menu\n\
2. Place Order\n\
3. View Order Queue\n\
4. Process Orders\n\
5. Manage Inventory\n\
6. Generate Sales Report\n\
7. Exit\n\
Enter your choice: ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    DisplayMenu,
    PlaceOrder,
    ViewQueue,
    ProcessOrders,
    ManageInventory,
    SalesReport,
    Exit,
}

impl Command {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().parse::<u32>().ok()? {
            1 => Some(Command::DisplayMenu),
            2 => Some(Command::PlaceOrder),
            3 => Some(Command::ViewQueue),
            4 => Some(Command::ProcessOrders),
            5 => Some(Command::ManageInventory),
            6 => Some(Command::SalesReport),
            7 => Some(Command::Exit),
            _ => None,
        }
    }
}

/// Whether the loop keeps prompting after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

pub struct Console<R, W> {
    lines: Lines<R>,
    output: W,
}

impl<R, W> Console<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(input: R, output: W) -> Self {
        Self {
            lines: input.lines(),
            output,
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Runs until the user picks Exit or the input ends.
    ///
    /// Errors from individual commands are printed and the loop carries on;
    /// only a broken console stream ends it early.
    pub async fn run(&mut self, state: &mut AppState) -> Result<(), AppError> {
        info!("console started");

        loop {
            self.write(MAIN_MENU).await?;

            let Some(line) = self.read_line().await? else {
                info!("input closed");
                break;
            };

            let Some(command) = Command::parse(&line) else {
                self.write("Invalid choice. Try again.\n").await?;
                continue;
            };

            match self.dispatch(command, state).await {
                Ok(Flow::Continue) => {}
                Ok(Flow::Exit) => break,
                Err(AppError::Io(err)) => return Err(AppError::Io(err)),
                Err(err) => {
                    warn!(?command, error = %err, "command failed");
                    self.write(&format!("Error: {err}\n")).await?;
                }
            }
        }

        info!("console stopped");
        Ok(())
    }

    async fn dispatch(&mut self, command: Command, state: &mut AppState) -> Result<Flow, AppError> {
        match command {
            Command::DisplayMenu => self.display_menu(state).await,
            Command::PlaceOrder => self.place_order(state).await,
            Command::ViewQueue => self.view_queue(state).await,
            Command::ProcessOrders => self.process_orders(state).await,
            Command::ManageInventory => self.manage_inventory(state).await,
            Command::SalesReport => self.sales_report(state).await,
            Command::Exit => {
                self.write("Exiting system. Goodbye!\n").await?;
                Ok(Flow::Exit)
            }
        }
    }

    async fn read_line(&mut self) -> Result<Option<String>, AppError> {
        Ok(self.lines.next_line().await?)
    }

    async fn write(&mut self, text: &str) -> Result<(), AppError> {
        self.output.write_all(text.as_bytes()).await?;
        self.output.flush().await?;
        Ok(())
    }
}
