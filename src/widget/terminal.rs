//! 终端版聊天小部件
//!
//! 从标准输入逐行读取问题，经 HTTP 发给中继端点，打印展示序列中的新条目。

use std::io::Write;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

use super::{ChatWidget, DisplayMessage, HttpRelayTransport, RelayTransport, Role};

/// 忙碌指示的刷新间隔
const BUSY_TICK: Duration = Duration::from_millis(400);

fn format_entry(message: &DisplayMessage) -> String {
    match message.role {
        Role::User => format!("you> {}", message.content),
        Role::Assistant => format!("assistant> {}", message.content),
    }
}

/// 打印 `shown` 之后新增的助手条目（用户输入已在终端回显）
fn render_new<T: RelayTransport>(widget: &ChatWidget<T>, shown: &mut usize) {
    let messages = widget.messages();
    for message in &messages[*shown..] {
        if message.role == Role::Assistant {
            println!("{}", format_entry(message));
        }
    }
    *shown = messages.len();
}

fn prompt() {
    print!("> ");
    let _ = std::io::stdout().flush();
}

/// 运行终端小部件，直到输入结束或输入 /quit
pub async fn run_terminal(endpoint: &str) -> anyhow::Result<()> {
    let widget = ChatWidget::new(HttpRelayTransport::new(endpoint)?);
    let mut shown = 0;

    println!("Connected to {} (type /quit to leave)", endpoint);
    render_new(&widget, &mut shown);
    prompt();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if matches!(line.trim(), "/quit" | "/exit") {
            break;
        }

        widget.set_input(line);
        let send = widget.send();
        tokio::pin!(send);
        let mut ticker = tokio::time::interval(BUSY_TICK);
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = &mut send => break,
                _ = ticker.tick() => {
                    if widget.is_busy() {
                        print!(".");
                        let _ = std::io::stdout().flush();
                    }
                }
            }
        }
        if shown < widget.messages().len() {
            println!();
        }

        render_new(&widget, &mut shown);
        prompt();
    }

    widget.unmount();
    Ok(())
}
