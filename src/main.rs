use mahjong_hand::{app, error};

fn main() {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        error!("mode not specified");
        return;
    }

    let args2 = args[2..].to_vec();
    match args[1].as_str() {
        "C" => {
            // Calculator (役計算モード)
            app::CalculatorApp::new(args2).run();
        }
        "A" => {
            // Actions (鳴き候補の列挙モード)
            app::ActionsApp::new(args2).run();
        }
        m => {
            error!("unknown mode: {}", m)
        }
    }
}
