// 標準エラー出力へのログ出力 [LEVEL](file:line) message
// file!(), line!() は最初のマクロ呼び出し元の位置になる

#[doc(hidden)]
#[macro_export]
macro_rules! __log {
    ($level: expr, $($arg:tt)*) => {
        eprintln!(
            "[{}]({}:{}) {}",
            $level,
            file!(),
            line!(),
            format_args!($($arg)*)
        )
    };
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::__log!("ERROR", $($arg)*)
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::__log!("WARN", $($arg)*)
    };
}

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::__log!("INFO", $($arg)*)
    };
}

// releaseビルドでは出力しない
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        if cfg!(debug_assertions) {
            $crate::__log!("DEBUG", $($arg)*)
        }
    };
}
