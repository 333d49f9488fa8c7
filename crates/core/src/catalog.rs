// Static challenge and snippet catalogue
//
// Read-only tables keyed by id. Loading an entry overwrites the editor
// buffer but never touches persisted code; only an explicit save does.

use crate::language::Language;

/// A practice challenge with one template per supported language.
pub struct Challenge {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    lua: Option<&'static str>,
    python: Option<&'static str>,
}

/// A reference snippet. Some snippets only exist for one language.
pub struct Snippet {
    pub id: &'static str,
    lua: Option<&'static str>,
    python: Option<&'static str>,
}

impl Challenge {
    pub fn template(&self, language: Language) -> Option<&'static str> {
        match language {
            Language::Lua => self.lua,
            Language::Python => self.python,
        }
    }

    /// Languages this challenge has a template for.
    pub fn languages(&self) -> Vec<Language> {
        Language::ALL
            .iter()
            .copied()
            .filter(|l| self.template(*l).is_some())
            .collect()
    }
}

impl Snippet {
    pub fn template(&self, language: Language) -> Option<&'static str> {
        match language {
            Language::Lua => self.lua,
            Language::Python => self.python,
        }
    }

    /// Languages this snippet has a template for.
    pub fn languages(&self) -> Vec<Language> {
        Language::ALL
            .iter()
            .copied()
            .filter(|l| self.template(*l).is_some())
            .collect()
    }
}

pub fn challenge(id: &str) -> Option<&'static Challenge> {
    CHALLENGES.iter().find(|c| c.id == id)
}

pub fn snippet(id: &str) -> Option<&'static Snippet> {
    SNIPPETS.iter().find(|s| s.id == id)
}

/// Welcome template shown when a language has no saved code yet.
pub fn default_template(language: Language) -> &'static str {
    match language {
        Language::Lua => DEFAULT_LUA,
        Language::Python => DEFAULT_PYTHON,
    }
}

const DEFAULT_LUA: &str = r#"-- Welcome to the Scriptpad playground!
-- Write Lua here and run it to see the output.

print("Hello, Scriptpad!")

-- Functions
local function greet(name)
  return "Welcome, " .. name .. "!"
end

print(greet("student"))

-- Tables and loops
local subjects = { "Math", "Science", "Programming" }
for _, subject in ipairs(subjects) do
  print("Studying: " .. subject)
end

-- A small calculation
local function grade(score, total)
  return string.format("Grade: %.1f%%", score / total * 100)
end

print(grade(85, 100))
"#;

const DEFAULT_PYTHON: &str = r#"# Welcome to the Scriptpad playground!
# Write Python here and run it to see the output.

print("Hello, Scriptpad!")

# Functions
def greet(name):
    return f"Welcome, {name}!"

print(greet("student"))

# Lists and loops
subjects = ["Math", "Science", "Programming"]
for subject in subjects:
    print(f"Studying: {subject}")

# A small calculation
def grade(score, total):
    return f"Grade: {score / total * 100:.1f}%"

print(grade(85, 100))

# List comprehension
squares = [x ** 2 for x in range(1, 6)]
print(f"Squares: {squares}")
"#;

pub static CHALLENGES: &[Challenge] = &[
    Challenge {
        id: "fizzbuzz",
        title: "FizzBuzz Classic",
        description: "Print numbers 1-100, but for multiples of 3 print \"Fizz\", \
                      multiples of 5 print \"Buzz\", and multiples of both print \"FizzBuzz\".",
        lua: Some(
            r#"-- FizzBuzz Challenge
-- Print numbers 1-100 with the following rules:
--   multiples of 3: print "Fizz"
--   multiples of 5: print "Buzz"
--   multiples of both: print "FizzBuzz"
--   anything else: print the number

for i = 1, 100 do
  -- your code here
end
"#,
        ),
        python: Some(
            r#"# FizzBuzz Challenge
# Print numbers 1-100 with the following rules:
#   multiples of 3: print "Fizz"
#   multiples of 5: print "Buzz"
#   multiples of both: print "FizzBuzz"
#   anything else: print the number

for i in range(1, 101):
    # your code here
    pass
"#,
        ),
    },
    Challenge {
        id: "palindrome",
        title: "Palindrome Check",
        description: "Check whether a word reads the same backward as forward, \
                      ignoring spaces and case.",
        lua: Some(
            r#"-- Palindrome Checker
-- Return true if a string reads the same forwards and backwards,
-- ignoring spaces and case.

local function is_palindrome(s)
  -- your code here
end

print(is_palindrome("racecar"))                     -- expected: true
print(is_palindrome("A man a plan a canal Panama")) -- expected: true
print(is_palindrome("race a car"))                  -- expected: false
print(is_palindrome("hello"))                       -- expected: false
"#,
        ),
        python: Some(
            r#"# Palindrome Checker
# Return True if a string reads the same forwards and backwards,
# ignoring spaces and case.

def is_palindrome(s):
    # your code here
    pass

print(is_palindrome("racecar"))                      # expected: True
print(is_palindrome("A man a plan a canal Panama"))  # expected: True
print(is_palindrome("race a car"))                   # expected: False
print(is_palindrome("hello"))                        # expected: False
"#,
        ),
    },
    Challenge {
        id: "sorting",
        title: "Array Sorter",
        description: "Implement bubble sort and quick sort and compare them on sample data.",
        lua: Some(
            r#"-- Sorting Algorithms
-- Implement bubble sort and quick sort.

local function bubble_sort(arr)
  -- your code here
end

local function quick_sort(arr)
  -- your code here
end

local test = { 64, 34, 25, 12, 22, 11, 90 }
print("Original: " .. table.concat(test, ", "))
-- print the sorted results once implemented
"#,
        ),
        python: Some(
            r#"# Sorting Algorithms
# Implement bubble sort and quick sort.

def bubble_sort(arr):
    # your code here
    pass

def quick_sort(arr):
    # your code here
    pass

test = [64, 34, 25, 12, 22, 11, 90]
print("Original:", test)
print("Bubble sorted:", bubble_sort(test.copy()))
print("Quick sorted:", quick_sort(test.copy()))
"#,
        ),
    },
    Challenge {
        id: "calculator",
        title: "Calculator App",
        description: "Build a calculator with basic arithmetic and proper handling \
                      of division by zero.",
        lua: Some(
            r#"-- Simple Calculator
-- Implement the four operations; divide must handle division by zero.

local Calculator = {}
Calculator.__index = Calculator

function Calculator.new()
  return setmetatable({}, Calculator)
end

function Calculator:add(a, b)
  -- your code here
end

function Calculator:subtract(a, b)
  -- your code here
end

function Calculator:multiply(a, b)
  -- your code here
end

function Calculator:divide(a, b)
  -- your code here (remember division by zero!)
end

local calc = Calculator.new()
print("5 + 3 =", calc:add(5, 3))
print("10 - 4 =", calc:subtract(10, 4))
print("6 * 7 =", calc:multiply(6, 7))
print("15 / 3 =", calc:divide(15, 3))
print("10 / 0 =", calc:divide(10, 0))
"#,
        ),
        python: Some(
            r#"# Simple Calculator
# Implement the four operations; divide must handle division by zero.

class Calculator:
    def add(self, a, b):
        # your code here
        pass

    def subtract(self, a, b):
        # your code here
        pass

    def multiply(self, a, b):
        # your code here
        pass

    def divide(self, a, b):
        # your code here (remember division by zero!)
        pass

calc = Calculator()
print("5 + 3 =", calc.add(5, 3))
print("10 - 4 =", calc.subtract(10, 4))
print("6 * 7 =", calc.multiply(6, 7))
print("15 / 3 =", calc.divide(15, 3))
print("10 / 0 =", calc.divide(10, 0))
"#,
        ),
    },
    Challenge {
        id: "tree",
        title: "Binary Tree Traversal",
        description: "Implement inorder, preorder, and postorder traversal of a binary tree.",
        lua: Some(
            r#"-- Binary Tree Traversal
-- Implement inorder, preorder, and postorder traversal.

local function node(val, left, right)
  return { val = val, left = left, right = right }
end

local function inorder(n, out)
  -- left, root, right
end

local function preorder(n, out)
  -- root, left, right
end

local function postorder(n, out)
  -- left, right, root
end

-- Sample tree:    1
--               /   \
--              2     3
--             / \
--            4   5
local tree = node(1, node(2, node(4), node(5)), node(3))

local out = {}
inorder(tree, out)
print("Inorder: " .. table.concat(out, ", "))
"#,
        ),
        python: Some(
            r#"# Binary Tree Traversal
# Implement inorder, preorder, and postorder traversal.

class TreeNode:
    def __init__(self, val=0, left=None, right=None):
        self.val = val
        self.left = left
        self.right = right

def inorder(node, out):
    # left, root, right
    pass

def preorder(node, out):
    # root, left, right
    pass

def postorder(node, out):
    # left, right, root
    pass

# Sample tree:    1
#               /   \
#              2     3
#             / \
#            4   5
tree = TreeNode(1, TreeNode(2, TreeNode(4), TreeNode(5)), TreeNode(3))

out = []
inorder(tree, out)
print("Inorder:", out)
"#,
        ),
    },
    Challenge {
        id: "nqueens",
        title: "N-Queens Problem",
        description: "Solve the classic N-Queens problem with backtracking.",
        lua: Some(
            r#"-- N-Queens Problem
-- Place N queens on an NxN board so no two queens attack each other.

local N = 4
local board = {}
for r = 1, N do
  board[r] = {}
  for c = 1, N do
    board[r][c] = 0
  end
end

local solutions = 0

local function is_safe(row, col)
  -- your code here
end

local function solve(row)
  -- backtracking: try each column in this row
end

print("Solving " .. N .. "-Queens problem...")
solve(1)
print("Found " .. solutions .. " solution(s)")
"#,
        ),
        python: Some(
            r#"# N-Queens Problem
# Place N queens on an NxN board so no two queens attack each other.

N = 4
board = [[0] * N for _ in range(N)]
solutions = []

def is_safe(row, col):
    # your code here
    pass

def solve(row=0):
    # backtracking: try each column in this row
    pass

print(f"Solving {N}-Queens problem...")
solve()
print(f"Found {len(solutions)} solution(s)")
"#,
        ),
    },
];

pub static SNIPPETS: &[Snippet] = &[
    Snippet {
        id: "table-ops",
        lua: Some(
            r#"-- Lua table operations cheat sheet

local fruits = { "apple", "banana", "orange", "grape" }
local numbers = { 1, 2, 3, 4, 5 }

-- Adding and removing
print("=== Adding/Removing ===")
table.insert(fruits, "mango")          -- append
print("After insert: " .. table.concat(fruits, ", "))

table.insert(fruits, 1, "strawberry")  -- prepend
print("After prepend: " .. table.concat(fruits, ", "))

local last = table.remove(fruits)      -- pop from end
print("Removed: " .. last)

-- Transformation
print("=== Transformation ===")
local doubled = {}
for i, n in ipairs(numbers) do
  doubled[i] = n * 2
end
print("Doubled: " .. table.concat(doubled, ", "))

local sum = 0
for _, n in ipairs(numbers) do
  sum = sum + n
end
print("Sum: " .. sum)

-- Sorting
print("=== Sorting ===")
table.sort(fruits)
print("Sorted: " .. table.concat(fruits, ", "))
table.sort(numbers, function(a, b) return a > b end)
print("Descending: " .. table.concat(numbers, ", "))
"#,
        ),
        python: Some(
            r#"# Python list operations cheat sheet

fruits = ["apple", "banana", "orange", "grape"]
numbers = [1, 2, 3, 4, 5]

# Adding and removing
print("=== Adding/Removing ===")
fruits.append("mango")
print("After append:", fruits)

fruits.insert(0, "strawberry")
print("After insert:", fruits)

last = fruits.pop()
print("Popped:", last)

# Transformation
print("=== Transformation ===")
print("Doubled:", [n * 2 for n in numbers])
print("Evens:", [n for n in numbers if n % 2 == 0])
print("Sum:", sum(numbers))

# Search
print("=== Search ===")
print("Index of orange:", fruits.index("orange"))
print("Has banana:", "banana" in fruits)

# Sorting
print("=== Sorting ===")
print("Sorted copy:", sorted(fruits))
print("Descending:", sorted(numbers, reverse=True))
"#,
        ),
    },
    Snippet {
        id: "string-ops",
        lua: Some(
            r#"-- Lua string operations cheat sheet

local s = "  Scriptpad Playground  "

print("Upper: " .. s:upper())
print("Lower: " .. s:lower())
print("Trimmed: '" .. s:match("^%s*(.-)%s*$") .. "'")
print("Length: " .. #s)
print("Sub(3, 11): '" .. s:sub(3, 11) .. "'")
print("Replaced: " .. s:gsub("Playground", "Editor"))

-- Formatting
print(string.format("Pi is roughly %.2f", math.pi))
print(string.format("%d items, %s state", 3, "ready"))

-- Iterating words
for word in s:gmatch("%S+") do
  print("word: " .. word)
end
"#,
        ),
        python: Some(
            r#"# Python string operations cheat sheet

s = "  Scriptpad Playground  "

print("Upper:", s.upper())
print("Lower:", s.lower())
print("Trimmed:", repr(s.strip()))
print("Length:", len(s))
print("Slice [2:11]:", repr(s[2:11]))
print("Replaced:", s.replace("Playground", "Editor"))

# Formatting
import math
print(f"Pi is roughly {math.pi:.2f}")
print("{} items, {} state".format(3, "ready"))

# Iterating words
for word in s.split():
    print("word:", word)
"#,
        ),
    },
    Snippet {
        id: "list-comprehensions",
        lua: None,
        python: Some(
            r#"# Python list comprehensions

numbers = [1, 2, 3, 4, 5]

# Basic mapping
squares = [x ** 2 for x in numbers]
print("Squares:", squares)

# Filtering
evens = [x for x in range(10) if x % 2 == 0]
print("Evens:", evens)

# Map + filter combined
odd_squares = [x ** 2 for x in range(10) if x % 2 == 1]
print("Odd squares:", odd_squares)

# Nested: flatten a matrix
matrix = [[1, 2, 3], [4, 5, 6], [7, 8, 9]]
flat = [item for row in matrix for item in row]
print("Flattened:", flat)

# Dict and set comprehensions
words = ["hello", "world", "python"]
lengths = {w: len(w) for w in words}
print("Lengths:", lengths)
unique_lengths = {len(w) for w in words}
print("Unique lengths:", unique_lengths)
"#,
        ),
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fizzbuzz_has_templates_for_both_languages() {
        let ch = challenge("fizzbuzz").unwrap();
        assert_eq!(ch.title, "FizzBuzz Classic");
        assert!(ch.template(Language::Lua).unwrap().contains("for i = 1, 100 do"));
        assert!(ch.template(Language::Python).unwrap().contains("range(1, 101)"));
    }

    #[test]
    fn unknown_ids_are_absent() {
        assert!(challenge("does-not-exist").is_none());
        assert!(snippet("does-not-exist").is_none());
    }

    #[test]
    fn list_comprehensions_snippet_is_python_only() {
        let sn = snippet("list-comprehensions").unwrap();
        assert!(sn.template(Language::Lua).is_none());
        assert!(sn.template(Language::Python).is_some());
    }

    #[test]
    fn every_language_has_a_default_template() {
        for lang in Language::ALL {
            assert!(!default_template(lang).trim().is_empty());
        }
    }

    #[test]
    fn challenge_ids_are_unique() {
        for (i, a) in CHALLENGES.iter().enumerate() {
            for b in &CHALLENGES[i + 1..] {
                assert_ne!(a.id, b.id);
            }
        }
    }
}
