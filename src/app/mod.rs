// mainから直接呼び出すアプリケーションの動作モード(C, A)のモジュール

mod actions;
mod calculator;

pub use actions::ActionsApp;
pub use calculator::CalculatorApp;
