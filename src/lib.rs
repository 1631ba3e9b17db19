//! Opcode table, guest memory, CPU core, and run loop for the stack
//! machine (§2 components 1, 5, 6).

pub mod constants;
pub mod cpu;
pub mod memory;
pub mod opcode;
pub mod run;

pub use cpu::{Cpu, Fault};
pub use memory::Memory;
pub use opcode::{OpCode, OpcodeError};
pub use run::{run, RunOptions};

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// Sums `data[1 ..= data[0]]` into `memory[0]`, per §8 scenarios 4/5.
    ///
    /// `cnt` holds the loop counter (counts down from `data[0]` to zero);
    /// the running sum lives at the bottom of the operand stack until the
    /// loop exits, at which point it is written back to `memory[0]`.
    fn array_sum_program() -> Vec<u16> {
        vec![
            13, 0, // 0: push 0
            9,  // 2: load              -> count
            24, // 3: stc               -> cnt := count
            13, 0, // 4: push 0         -> sum := 0
            // loop: index 6
            13, 17, // 6: push 17       -> exit target
            23, // 8: cts               -> push cnt
            12, // 9: jz                -> pop cnt, pop target; if cnt==0 goto exit
            23, // 10: cts              -> push cnt (index)
            9,  // 11: load             -> data[cnt]
            1,  // 12: add              -> sum += data[cnt]
            22, // 13: cdec             -> cnt -= 1
            13, 6, // 14: push 6        -> loop target
            11, // 16: jmp
            // exit: index 17
            13, 0, // 17: push 0        -> address 0
            10, // 19: stor             -> memory[0] := sum
            25, // 20: term
        ]
    }

    fn run_cpu(program: &[u16], data: &[u16]) -> Cpu<Cursor<Vec<u8>>, Vec<u8>> {
        let mut cpu = Cpu::with_io(program, data, Cursor::new(Vec::new()), Vec::new());
        while cpu.is_running() {
            cpu.tick().unwrap();
        }
        cpu
    }

    #[test]
    fn array_sum_over_nonempty_array() {
        let program = array_sum_program();
        let cpu = run_cpu(&program, &[5, 1, 2, 3, 4, 5]);
        assert_eq!(cpu.memory().read(0), Some(15));
    }

    #[test]
    fn array_sum_over_empty_array() {
        let program = array_sum_program();
        let cpu = run_cpu(&program, &[0]);
        assert_eq!(cpu.memory().read(0), Some(0));
    }

    #[test]
    fn dot_product_scenario() {
        // scenario 6: [1,2,3]·[4,5,6] = 32, produced on top of the stack.
        // Straight-line program (no loop/labels needed for a fixed-size
        // dot product): push each product term and add.
        let program: Vec<u16> = vec![
            13, 1, 13, 4, 26, // push 1, push 4, mul -> 4
            13, 2, 13, 5, 26, 1, // push 2, push 5, mul -> 10, add -> 14
            13, 3, 13, 6, 26, 1, // push 3, push 6, mul -> 18, add -> 32
            25, // term
        ];
        let cpu = run_cpu(&program, &[]);
        assert_eq!(cpu.stack(), &[32]);
    }
}
