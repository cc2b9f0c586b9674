#[tokio::main]
async fn main() {
    if let Err(e) = cuzdan_lib::run().await {
        // ログ初期化前に失敗した場合も見えるよう標準エラーにも出す
        log::error!("サーバーの起動に失敗しました: {}", e.details());
        eprintln!("サーバーの起動に失敗しました: {e}");
        std::process::exit(1);
    }
}
