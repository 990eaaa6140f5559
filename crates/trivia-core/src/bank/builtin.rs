//! Bundled questions. Options are listed with the correct answer first;
//! selection shuffles them before they reach the player.

/// `(text, options, correct_answer)`
pub(super) type Entry = (&'static str, [&'static str; 4], &'static str);

pub(super) const EASY: [Entry; 15] = [
    ("What is 2 + 2?", ["4", "3", "5", "6"], "4"),
    ("What is the capital of France?", ["Paris", "Berlin", "Rome", "Madrid"], "Paris"),
    ("How many days are in a week?", ["7", "5", "6", "8"], "7"),
    ("What color do you get by mixing blue and yellow?", ["Green", "Purple", "Orange", "Brown"], "Green"),
    ("Which animal is known as the king of the jungle?", ["Lion", "Tiger", "Elephant", "Gorilla"], "Lion"),
    ("How many legs does a spider have?", ["8", "6", "10", "4"], "8"),
    ("Which planet do we live on?", ["Earth", "Mars", "Venus", "Jupiter"], "Earth"),
    ("What is the freezing point of water in Celsius?", ["0", "32", "100", "-10"], "0"),
    ("Which is the largest ocean?", ["Pacific", "Atlantic", "Indian", "Arctic"], "Pacific"),
    ("What is 10 - 3?", ["7", "6", "8", "13"], "7"),
    ("Which fruit is yellow and curved?", ["Banana", "Apple", "Grape", "Cherry"], "Banana"),
    ("How many months have 28 days or more?", ["12", "1", "6", "11"], "12"),
    ("What do bees make?", ["Honey", "Milk", "Silk", "Wax paper"], "Honey"),
    ("Which shape has three sides?", ["Triangle", "Square", "Circle", "Pentagon"], "Triangle"),
    ("What is the opposite of hot?", ["Cold", "Warm", "Wet", "Soft"], "Cold"),
];

pub(super) const NORMAL: [Entry; 15] = [
    ("What is the capital of Australia?", ["Canberra", "Sydney", "Melbourne", "Perth"], "Canberra"),
    ("Which element has the chemical symbol O?", ["Oxygen", "Gold", "Osmium", "Iron"], "Oxygen"),
    ("Who painted the Mona Lisa?", ["Leonardo da Vinci", "Michelangelo", "Raphael", "Donatello"], "Leonardo da Vinci"),
    ("What is 12 * 12?", ["144", "124", "132", "154"], "144"),
    ("Which planet is known as the Red Planet?", ["Mars", "Jupiter", "Saturn", "Mercury"], "Mars"),
    ("How many continents are there?", ["7", "5", "6", "8"], "7"),
    ("What is the longest river in Africa?", ["Nile", "Congo", "Niger", "Zambezi"], "Nile"),
    ("In which year did World War II end?", ["1945", "1939", "1944", "1950"], "1945"),
    ("What gas do plants absorb from the air?", ["Carbon dioxide", "Oxygen", "Nitrogen", "Helium"], "Carbon dioxide"),
    ("What is the hardest natural substance?", ["Diamond", "Quartz", "Granite", "Iron"], "Diamond"),
    ("Which language has the most native speakers?", ["Mandarin Chinese", "English", "Spanish", "Hindi"], "Mandarin Chinese"),
    ("How many sides does a hexagon have?", ["6", "5", "7", "8"], "6"),
    ("What is the square root of 81?", ["9", "8", "7", "11"], "9"),
    ("Which organ pumps blood through the body?", ["Heart", "Liver", "Lungs", "Kidney"], "Heart"),
    ("What is the largest planet in the Solar System?", ["Jupiter", "Saturn", "Neptune", "Earth"], "Jupiter"),
];

pub(super) const HARD: [Entry; 15] = [
    ("What is the atomic number of carbon?", ["6", "8", "12", "14"], "6"),
    ("Who formulated the theory of general relativity?", ["Albert Einstein", "Isaac Newton", "Niels Bohr", "Max Planck"], "Albert Einstein"),
    ("What is the capital of Mongolia?", ["Ulaanbaatar", "Astana", "Bishkek", "Tashkent"], "Ulaanbaatar"),
    ("In which year did the Berlin Wall fall?", ["1989", "1987", "1991", "1985"], "1989"),
    ("What is the smallest prime number greater than 50?", ["53", "51", "57", "59"], "53"),
    ("Which scientist proposed the three laws of planetary motion?", ["Johannes Kepler", "Galileo Galilei", "Tycho Brahe", "Nicolaus Copernicus"], "Johannes Kepler"),
    ("What is the chemical symbol for tungsten?", ["W", "Tu", "Tg", "Wo"], "W"),
    ("Which country has the most time zones?", ["France", "Russia", "United States", "China"], "France"),
    ("What is the derivative of sin(x)?", ["cos(x)", "-cos(x)", "sin(x)", "-sin(x)"], "cos(x)"),
    ("Who wrote 'One Hundred Years of Solitude'?", ["Gabriel Garcia Marquez", "Jorge Luis Borges", "Pablo Neruda", "Mario Vargas Llosa"], "Gabriel Garcia Marquez"),
    ("What is the speed of light in vacuum, in km/s (rounded)?", ["300000", "150000", "30000", "3000000"], "300000"),
    ("Which bone is the longest in the human body?", ["Femur", "Tibia", "Humerus", "Fibula"], "Femur"),
    ("How many bits are in a byte?", ["8", "4", "16", "32"], "8"),
    ("What is 2 to the power of 10?", ["1024", "1000", "512", "2048"], "1024"),
    ("Which ancient wonder stood in Alexandria?", ["The Lighthouse", "The Colossus", "The Hanging Gardens", "The Mausoleum"], "The Lighthouse"),
];
