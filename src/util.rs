/// Checks that a numerical value is in the interval `[a,b]` and returns early with
/// [`ConfigError::OutOfInterval`](crate::error::ConfigError::OutOfInterval) if not
///
/// ### Example
/// ```ignore
/// let learning_rate = 2.0;
/// check_interval!(learning_rate, 0.0, 1.0);
/// ```
/// This returns `Err` with the message "invalid value for \`learning_rate\`: 2 is not in the interval \[0, 1\]".
#[macro_export]
macro_rules! check_interval {
    ($var:expr, $a:expr, $b:expr) => {
        if !($var >= $a && $var <= $b) {
            return Err($crate::error::ConfigError::OutOfInterval {
                name: stringify!($var),
                value: $var as f64,
                min: $a as f64,
                max: $b as f64,
            });
        }
    };
}
