/// Values that may ride along with a publication without synchronization of their own
///
/// The auxiliary value is written by the producer before the release point and read by the
/// consumer after the acquire point, as a plain bitwise copy. That is only sound for types
/// that are trivially copyable and carry no destructor, which `Copy` guarantees; being a
/// sized type parameter rules out dynamic dispatch. The blanket implementation means any
/// such type qualifies without opting in.
///
/// 可以随发布一起传递、自身无需同步的值
///
/// 辅助值在 release 点之前由生产者写入，在 acquire 点之后由消费者按位复制读取。
/// 只有可平凡复制且没有析构函数的类型（即 `Copy`）才是安全的。
///
/// ```compile_fail
/// fn requires_plain<A: handoff::Plain>() {}
/// requires_plain::<String>(); // String is not Copy
/// ```
pub trait Plain: Copy + Send + 'static {}

impl<A: Copy + Send + 'static> Plain for A {}

#[cfg(test)]
mod tests {
    use super::Plain;

    fn assert_plain<A: Plain>() {}

    #[test]
    fn test_primitive_and_aggregate_types_are_plain() {
        assert_plain::<i32>();
        assert_plain::<u64>();
        assert_plain::<()>();
        assert_plain::<(u8, bool)>();
        assert_plain::<[u16; 4]>();
        assert_plain::<&'static str>();
    }

    #[test]
    fn test_derived_copy_struct_is_plain() {
        #[derive(Clone, Copy)]
        struct Stamp {
            _year: u16,
            _seq: u32,
        }

        assert_plain::<Stamp>();
    }
}
